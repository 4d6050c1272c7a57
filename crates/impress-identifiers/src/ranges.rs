//! ISBN registration ranges
//!
//! The ISBN agency publishes the registration groups as an
//! `ISBNRangeMessage` XML document. Each group has a prefix (`978-0`) and
//! rules mapping a range of the following digits to the length of the
//! registrant element. The table flattens those rules into aligned arrays:
//! `start` and `end` hold the 13-digit bounds of each rule and `split` a
//! packed decimal code of the segment lengths that follow the first one.
//!
//! For `978-0` with registrant length 2 the segment lengths are
//! `3,1,2,6,1`, so the code is `1261` and `9780123456786` splits into
//! `978-0-12-345678-6`.

use std::sync::OnceLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, error};

use crate::error::{Result, ValueError};

/// Abridged registration range message bundled with the crate.
const BUNDLED_RANGES: &str = include_str!("../data/RangeMessage.xml");

static TABLE: OnceLock<RangeTable> = OnceLock::new();

/// Sorted lookup table from 13-digit ranges to split codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeTable {
    start: Vec<u64>,
    end: Vec<u64>,
    split: Vec<u32>,
}

impl RangeTable {
    /// The process-wide table, built from the installed or bundled
    /// message on first use.
    pub fn global() -> &'static RangeTable {
        TABLE.get_or_init(|| match RangeTable::from_xml(BUNDLED_RANGES) {
            Ok(table) => table,
            Err(e) => {
                error!("bundled ISBN ranges unusable: {}", e);
                RangeTable::default()
            }
        })
    }

    /// Install a table as the process-wide one.
    ///
    /// Only possible before the first split; afterwards the installed table
    /// is handed back.
    pub fn install(table: RangeTable) -> std::result::Result<(), RangeTable> {
        TABLE.set(table)
    }

    /// Build a table from an `ISBNRangeMessage` document.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut rows: Vec<Row> = Vec::new();
        let mut buf = Vec::new();

        let mut saw_root = false;
        let mut in_groups = false;
        let mut current_element = String::new();
        let mut prefix = String::new();
        let mut rules: Vec<(String, String)> = Vec::new();
        let mut range = String::new();
        let mut length = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if !saw_root {
                        if name != "ISBNRangeMessage" {
                            return Err(ValueError::RangeSource(format!(
                                "root is {name}, not ISBNRangeMessage"
                            )));
                        }
                        saw_root = true;
                    }
                    match name.as_str() {
                        "RegistrationGroups" => in_groups = true,
                        "Group" if in_groups => {
                            prefix.clear();
                            rules.clear();
                        }
                        "Rule" if in_groups => {
                            range.clear();
                            length.clear();
                        }
                        _ => {}
                    }
                    current_element = name;
                }
                Ok(Event::End(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match name.as_str() {
                        "RegistrationGroups" => in_groups = false,
                        "Rule" if in_groups => {
                            rules.push((std::mem::take(&mut range), std::mem::take(&mut length)));
                        }
                        "Group" if in_groups => {
                            load_group(&prefix, &rules, &mut rows)?;
                        }
                        _ => {}
                    }
                    current_element.clear();
                }
                Ok(Event::Text(e)) => {
                    if in_groups {
                        let text = e
                            .unescape()
                            .map_err(|e| ValueError::RangeSource(format!("bad text: {}", e)))?
                            .to_string();
                        match current_element.as_str() {
                            "Prefix" => prefix = text,
                            "Range" => range = text,
                            "Length" => length = text,
                            _ => {}
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ValueError::RangeSource(format!("XML parse error: {}", e))),
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(ValueError::RangeSource("empty document".to_string()));
        }

        Ok(RangeTable::from_rows(rows))
    }

    fn from_rows(mut rows: Vec<Row>) -> Self {
        rows.sort_by_key(|row| row.start);
        let mut table = RangeTable::default();
        for row in rows {
            table.start.push(row.start);
            table.end.push(row.end);
            table.split.push(row.split);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.start.len()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty()
    }

    /// The split code of the rule covering `n`.
    pub fn lookup(&self, n: u64) -> Option<u32> {
        match self.start.partition_point(|&s| s <= n) {
            0 => None,
            i if n > self.end[i - 1] => None,
            i => Some(self.split[i - 1]),
        }
    }

    /// Split a 13-digit string into its registration segments.
    ///
    /// Returns `None` when no rule covers the value.
    pub fn split(&self, s: &str) -> Option<Vec<String>> {
        let n: u64 = s.parse().ok()?;
        let code = self.lookup(n)?;
        Some(split_with_code(s, code))
    }
}

/// Peel segment lengths off the right end of `s`, one decimal digit of
/// `code` at a time; whatever remains is the leading segment.
fn split_with_code(s: &str, mut code: u32) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = s;
    while code > 0 {
        let d = (code % 10) as usize;
        code /= 10;
        if d == 0 || d >= rest.len() {
            break;
        }
        let (head, tail) = rest.split_at(rest.len() - d);
        parts.push(tail.to_string());
        rest = head;
    }
    parts.push(rest.to_string());
    parts.reverse();
    parts
}

/// One flattened rule, before sorting.
struct Row {
    start: u64,
    end: u64,
    split: u32,
}

fn load_group(prefix: &str, rules: &[(String, String)], rows: &mut Vec<Row>) -> Result<()> {
    if prefix.is_empty() {
        return Err(ValueError::RangeSource("group without Prefix".to_string()));
    }
    let components: Vec<&str> = prefix.split('-').collect();
    let compact: String = components.concat();
    let prefix_lengths: Vec<usize> = components.iter().map(|c| c.len()).collect();
    let prefix_total: usize = prefix_lengths.iter().sum();
    if prefix_total >= 12 || !compact.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValueError::RangeSource(format!("bad prefix {prefix}")));
    }
    let remaining = 12 - prefix_total;
    debug!("prefix {} {:?} + {}", prefix, prefix_lengths, remaining);

    for (range, length) in rules {
        let (first, last) = range
            .split_once('-')
            .ok_or_else(|| ValueError::RangeSource(format!("{prefix}: bad range {range:?}")))?;
        let length: usize = length
            .trim()
            .parse()
            .map_err(|_| ValueError::RangeSource(format!("{prefix}: bad length {length:?}")))?;
        if length > remaining {
            return Err(ValueError::RangeSource(format!(
                "{prefix}: length {length} exceeds {remaining}"
            )));
        }

        let first = pad_to(first, remaining, '0');
        let last = pad_to(last, remaining, '9');

        let mut lengths = prefix_lengths.clone();
        if length > 0 {
            lengths.push(length);
            lengths.push(remaining - length);
        } else {
            lengths.push(remaining);
        }
        lengths.push(1);

        if lengths.iter().sum::<usize>() != 13 || lengths.iter().any(|&l| l == 0 || l > 9) {
            debug!("skipping {} {}: segment lengths {:?}", prefix, range, lengths);
            continue;
        }

        let code = lengths[1..]
            .iter()
            .fold(0u32, |acc, &l| acc * 10 + l as u32);
        let bound = |digits: &str, check: char| {
            format!("{compact}{digits}{check}")
                .parse::<u64>()
                .map_err(|_| ValueError::RangeSource(format!("{prefix}: bad range {range:?}")))
        };
        let start = bound(&first, '0')?;
        let end = bound(&last, '9')?;

        debug!("{} {} : {:?} -> {} for {}..={}", prefix, range, lengths, code, start, end);
        rows.push(Row {
            start,
            end,
            split: code,
        });
    }

    Ok(())
}

/// Right-pad a range bound with `fill`, or cut it, to `width` digits.
fn pad_to(bound: &str, width: usize, fill: char) -> String {
    let mut digits = bound.trim().to_string();
    while digits.len() < width {
        digits.push(fill);
    }
    digits.truncate(width);
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ISBNRangeMessage>
  <EAN.UCCPrefixes>
    <EAN.UCC>
      <Prefix>978</Prefix>
      <Rules>
        <Rule><Range>0000000-5999999</Range><Length>1</Length></Rule>
      </Rules>
    </EAN.UCC>
  </EAN.UCCPrefixes>
  <RegistrationGroups>
    <Group>
      <Prefix>978-1</Prefix>
      <Agency>English language</Agency>
      <Rules>
        <Rule><Range>0000000-0999999</Range><Length>2</Length></Rule>
        <Rule><Range>1000000-3999999</Range><Length>3</Length></Rule>
      </Rules>
    </Group>
    <Group>
      <Prefix>978-0</Prefix>
      <Agency>English language</Agency>
      <Rules>
        <Rule><Range>0000000-1999999</Range><Length>2</Length></Rule>
        <Rule><Range>2000000-6999999</Range><Length>0</Length></Rule>
      </Rules>
    </Group>
  </RegistrationGroups>
</ISBNRangeMessage>"#;

    #[test]
    fn test_table_is_sorted() {
        let table = RangeTable::from_xml(SMALL).unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.start.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(table.start[0], 9780000000000);
        assert_eq!(table.split[0], 1261);
    }

    #[test]
    fn test_ean_prefixes_are_ignored() {
        let table = RangeTable::from_xml(SMALL).unwrap();
        assert!(table.start.iter().all(|&s| s >= 9780000000000));
    }

    #[test]
    fn test_split() {
        let table = RangeTable::from_xml(SMALL).unwrap();
        assert_eq!(
            table.split("9780123456786").unwrap(),
            vec!["978", "0", "12", "345678", "6"]
        );
        assert_eq!(
            table.split("9781234567897").unwrap(),
            vec!["978", "1", "234", "56789", "7"]
        );
    }

    #[test]
    fn test_zero_length_rule() {
        let table = RangeTable::from_xml(SMALL).unwrap();
        assert_eq!(
            table.split("9780312345670").unwrap(),
            vec!["978", "0", "31234567", "0"]
        );
    }

    #[test]
    fn test_below_table() {
        let table = RangeTable::from_xml(SMALL).unwrap();
        assert_eq!(table.split("9770000000001"), None);
        assert_eq!(table.lookup(0), None);
    }

    #[test]
    fn test_past_rule_end() {
        let table = RangeTable::from_xml(SMALL).unwrap();
        assert_eq!(table.end[0], 9780199999999);
        // 978-1 rules stop at 3999999; 978-0 rules stop at 6999999.
        assert_eq!(table.split("9781500000000"), None);
        assert_eq!(table.split("9780712345678"), None);
        assert_eq!(table.split("9782000000000"), None);
        assert_eq!(
            table.split("9781399999999").unwrap(),
            vec!["978", "1", "399", "99999", "9"]
        );
    }

    #[test]
    fn test_bad_entity_is_error() {
        let xml = SMALL.replace("<Prefix>978-1</Prefix>", "<Prefix>978-&bogus;</Prefix>");
        let err = RangeTable::from_xml(&xml).unwrap_err();
        assert!(matches!(err, ValueError::RangeSource(_)));
    }

    #[test]
    fn test_wrong_root() {
        let err = RangeTable::from_xml("<Other></Other>").unwrap_err();
        assert!(matches!(err, ValueError::RangeSource(_)));
    }

    #[test]
    fn test_bundled_table_loads() {
        let table = RangeTable::from_xml(BUNDLED_RANGES).unwrap();
        assert!(!table.is_empty());
    }
}
