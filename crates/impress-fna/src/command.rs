//! Command table and help text

use impress_attrmap::RegistryKind;

/// Built-in commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Add,
    Compare,
    Decode,
    Decoder,
    Delete,
    Dir,
    Encode,
    Encoder,
    Extract,
    Factory,
    File,
    Filename,
    Help,
    Mode,
    Order,
    Quiet,
    Remove,
    Rename,
    Set,
    Sort,
    Suffix,
    Uri,
    Url,
}

/// Registries a shortcut name selects in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    Factory,
    /// Encoder and decoder together, wherever the name exists
    Coder,
    Mode,
}

impl Selection {
    pub fn registries(&self) -> &'static [RegistryKind] {
        match self {
            Selection::Factory => &[RegistryKind::Factory],
            Selection::Coder => &[RegistryKind::Decoder, RegistryKind::Encoder],
            Selection::Mode => &[RegistryKind::Mode],
        }
    }
}

/// What a command name dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Builtin(Builtin),
    Select(Selection),
}

/// Help metadata for a built-in command.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub builtin: Builtin,
    pub summary: &'static str,
    pub synopsis: &'static str,
    /// Paragraphs following the summary
    pub description: &'static [&'static str],
}

pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "add",
        builtin: Builtin::Add,
        summary: "Add an attribute.",
        synopsis: "add KEY VALUE",
        description: &["The value is built by the current factory."],
    },
    CommandSpec {
        name: "compare",
        builtin: Builtin::Compare,
        summary: "Print the original and new file names if they differ.",
        synopsis: "compare",
        description: &[],
    },
    CommandSpec {
        name: "decode",
        builtin: Builtin::Decode,
        summary: "Replace the attributes with a decoded string.",
        synopsis: "decode STRING",
        description: &["Decodes with the current decoder."],
    },
    CommandSpec {
        name: "decoder",
        builtin: Builtin::Decoder,
        summary: "Select the current decoder.",
        synopsis: "decoder NAME",
        description: &["Decoders are v2, v3 and json."],
    },
    CommandSpec {
        name: "delete",
        builtin: Builtin::Delete,
        summary: "Delete every attribute for one or more keys.",
        synopsis: "delete KEY[,KEY]*",
        description: &[
            "Keys that are not present are ignored.",
            "The complement of `delete` is `extract`.",
        ],
    },
    CommandSpec {
        name: "dir",
        builtin: Builtin::Dir,
        summary: "Set the directory of the file name.",
        synopsis: "dir PATH",
        description: &[],
    },
    CommandSpec {
        name: "encode",
        builtin: Builtin::Encode,
        summary: "Encode and print the attributes.",
        synopsis: "encode",
        description: &["Encodes with the current encoder and mode."],
    },
    CommandSpec {
        name: "encoder",
        builtin: Builtin::Encoder,
        summary: "Select the current encoder.",
        synopsis: "encoder NAME",
        description: &["Encoders are v2, v3 and json."],
    },
    CommandSpec {
        name: "extract",
        builtin: Builtin::Extract,
        summary: "Keep only the attributes for one or more keys.",
        synopsis: "extract KEY[,KEY]*",
        description: &[
            "Keys that are not present are ignored. Kept keys follow the given order.",
            "The complement of `extract` is `delete`.",
        ],
    },
    CommandSpec {
        name: "factory",
        builtin: Builtin::Factory,
        summary: "Select the current factory.",
        synopsis: "factory NAME",
        description: &[
            "`raw` keeps every value as text. `loose` and `typed` build identifiers \
             for known keys and text for the rest. `strict` rejects unknown keys.",
        ],
    },
    CommandSpec {
        name: "file",
        builtin: Builtin::File,
        summary: "Decode a file name.",
        synopsis: "file PATH",
        description: &[
            "Decodes the name without its directory and extension, which are kept \
             for `filename`, `compare` and `rename`.",
        ],
    },
    CommandSpec {
        name: "filename",
        builtin: Builtin::Filename,
        summary: "Encode and print the attributes as a file name.",
        synopsis: "filename",
        description: &["Encodes with the current encoder and mode."],
    },
    CommandSpec {
        name: "help",
        builtin: Builtin::Help,
        summary: "Show information about commands, or list them.",
        synopsis: "help [COMMAND]*",
        description: &[],
    },
    CommandSpec {
        name: "mode",
        builtin: Builtin::Mode,
        summary: "Select the current value mode.",
        synopsis: "mode NAME",
        description: &["Modes are short, long and repr."],
    },
    CommandSpec {
        name: "order",
        builtin: Builtin::Order,
        summary: "Arrange keys.",
        synopsis: "order (--all | KEY[,KEY]*)",
        description: &[
            "With `--all`, sorts the keys alphabetically.",
            "With keys, moves those keys to the front in the given order. \
             Other keys follow in their current order.",
        ],
    },
    CommandSpec {
        name: "quiet",
        builtin: Builtin::Quiet,
        summary: "Do not print the attributes at the end.",
        synopsis: "quiet",
        description: &[],
    },
    CommandSpec {
        name: "remove",
        builtin: Builtin::Remove,
        summary: "Remove an attribute.",
        synopsis: "remove KEY [VALUE]",
        description: &[
            "Removes the values of KEY equal to VALUE, built by the current factory. \
             Without VALUE, removes KEY entirely.",
        ],
    },
    CommandSpec {
        name: "rename",
        builtin: Builtin::Rename,
        summary: "Rename the file to its encoded name.",
        synopsis: "rename",
        description: &["Missing directories are created. An existing different file is never replaced."],
    },
    CommandSpec {
        name: "set",
        builtin: Builtin::Set,
        summary: "Set an attribute.",
        synopsis: "set KEY VALUE",
        description: &[
            "Replaces any existing values for KEY and moves KEY to the end. \
             The value is built by the current factory.",
        ],
    },
    CommandSpec {
        name: "sort",
        builtin: Builtin::Sort,
        summary: "Sort the values of some or all keys.",
        synopsis: "sort (--all | KEY[,KEY]*)",
        description: &[],
    },
    CommandSpec {
        name: "suffix",
        builtin: Builtin::Suffix,
        summary: "Set the extension of the file name.",
        synopsis: "suffix EXTENSION",
        description: &["A leading `.` is optional."],
    },
    CommandSpec {
        name: "uri",
        builtin: Builtin::Uri,
        summary: "Print attribute URIs.",
        synopsis: "uri",
        description: &["Prints one line for each attribute that has a URI."],
    },
    CommandSpec {
        name: "url",
        builtin: Builtin::Url,
        summary: "Print attribute URLs.",
        synopsis: "url",
        description: &["Prints one line for each attribute that has a URL."],
    },
];

pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name == name)
}

impl CommandSpec {
    /// Full help in NAME/SYNOPSIS/DESCRIPTION sections.
    pub fn help(&self) -> String {
        let mut out = format!(
            "NAME\n  {} - {}\n\nSYNOPSIS\n  {}\n\n",
            self.name, self.summary, self.synopsis
        );
        let paragraphs: Vec<String> = std::iter::once(self.summary)
            .chain(self.description.iter().copied())
            .map(|p| format!("  {p}"))
            .collect();
        out.push_str("DESCRIPTION\n");
        out.push_str(&paragraphs.join("\n\n"));
        out.push_str("\n\n");
        out
    }
}

/// The `COMMANDS` listing, sorted by name.
pub fn listing() -> String {
    let mut specs: Vec<&CommandSpec> = COMMANDS.iter().collect();
    specs.sort_by_key(|c| c.name);
    let mut out = String::from("COMMANDS\n");
    for spec in specs {
        out.push_str(&format!("  {:8} - {}\n", spec.name, spec.summary));
    }
    out
}
