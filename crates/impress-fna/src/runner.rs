//! Command interpreter
//!
//! A [`Runner`] consumes tokens left to right. Each command pulls its own
//! arguments from the stream. The first error aborts the run.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use impress_attrmap::{AttributeMap, Registries, RegistryKind};
use tracing::debug;

use crate::command::{self, Builtin, Op, Selection, COMMANDS};
use crate::error::{Result, RunError};
use crate::filename::FileContext;
use crate::rename::{FsRenamer, Renamer};

pub struct Runner<W: Write> {
    map: AttributeMap,
    report: bool,
    file: Option<FileContext>,
    commands: HashMap<String, Op>,
    renamer: Box<dyn Renamer>,
    out: W,
}

impl<W: Write> Runner<W> {
    /// A runner with an empty map on `registries`, writing to `out`.
    pub fn new(registries: Registries, out: W) -> Self {
        let mut commands: HashMap<String, Op> = COMMANDS
            .iter()
            .map(|c| (c.name.to_string(), Op::Builtin(c.builtin)))
            .collect();
        for (kind, selection) in [
            (RegistryKind::Factory, Selection::Factory),
            (RegistryKind::Encoder, Selection::Coder),
            (RegistryKind::Decoder, Selection::Coder),
            (RegistryKind::Mode, Selection::Mode),
        ] {
            for name in registries.keys(kind) {
                commands.insert(name, Op::Select(selection));
            }
        }

        Self {
            map: AttributeMap::new(registries),
            report: false,
            file: None,
            commands,
            renamer: Box::new(FsRenamer),
            out,
        }
    }

    /// Replace the file renamer.
    pub fn with_renamer(mut self, renamer: Box<dyn Renamer>) -> Self {
        self.renamer = renamer;
        self
    }

    pub fn map(&self) -> &AttributeMap {
        &self.map
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run whitespace-separated commands.
    pub fn runs(&mut self, s: &str) -> Result<()> {
        self.run(s.split_whitespace())
    }

    /// Run a token stream, then print the attributes if a command left
    /// them changed and unprinted.
    pub fn run<I, S>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = tokens.into_iter().map(Into::into);
        while let Some(name) = tokens.next() {
            let op = *self
                .commands
                .get(&name)
                .ok_or_else(|| RunError::UnknownCommand(name.clone()))?;
            debug!("command {} -> {:?}", name, op);
            match op {
                Op::Builtin(builtin) => self.builtin(builtin, &name, &mut tokens)?,
                Op::Select(selection) => self.select(selection, &name)?,
            }
        }

        if self.report {
            let line = self.current()?;
            writeln!(self.out, "{line}")?;
            self.report = false;
        }
        Ok(())
    }

    fn builtin(
        &mut self,
        builtin: Builtin,
        cmd: &str,
        tokens: &mut dyn Iterator<Item = String>,
    ) -> Result<()> {
        match builtin {
            Builtin::Add => {
                let key = need(tokens, cmd, "key")?;
                let value = need(tokens, cmd, "value")?;
                self.map
                    .add(&key, &value)
                    .map_err(RunError::command(cmd))?;
                self.report = true;
            }
            Builtin::Set => {
                let key = need(tokens, cmd, "key")?;
                let value = need(tokens, cmd, "value")?;
                self.map
                    .set(&key, &value)
                    .map_err(RunError::command(cmd))?;
                self.report = true;
            }
            Builtin::Remove => {
                let key = need(tokens, cmd, "key")?;
                match tokens.next() {
                    Some(value) => {
                        self.map
                            .remove_value(&key, &value)
                            .map_err(RunError::command(cmd))?;
                    }
                    None => {
                        self.map.remove(&key);
                    }
                }
                self.report = true;
            }
            Builtin::Delete => {
                let keys = need(tokens, cmd, "keys")?;
                for key in keys.split(',') {
                    self.map.remove(key);
                }
                self.report = true;
            }
            Builtin::Extract => {
                let keys = need(tokens, cmd, "keys")?;
                let keys: Vec<&str> = keys.split(',').collect();
                self.map = self.map.submap(&keys);
                self.report = true;
            }
            Builtin::Order => {
                let arg = need(tokens, cmd, "keys or --all")?;
                self.map = if arg == "--all" {
                    self.map.sortkeys(None)
                } else {
                    let keys: Vec<&str> = arg.split(',').collect();
                    self.map.sortkeys(Some(&keys))
                };
                self.report = true;
            }
            Builtin::Sort => {
                let arg = need(tokens, cmd, "keys or --all")?;
                if arg == "--all" {
                    self.map.sort(&[]);
                } else {
                    let keys: Vec<&str> = arg.split(',').collect();
                    self.map.sort(&keys);
                }
                self.report = true;
            }
            Builtin::Decode => {
                let s = need(tokens, cmd, "string")?;
                self.map.decode(&s).map_err(RunError::command(cmd))?;
                self.report = true;
            }
            Builtin::File => {
                let path = need(tokens, cmd, "file name")?;
                let (context, stem) = FileContext::from_path(&path);
                self.map.decode(&stem).map_err(RunError::command(cmd))?;
                self.file = Some(context);
                self.report = true;
            }
            Builtin::Dir => {
                let dir = need(tokens, cmd, "directory")?;
                self.file.get_or_insert_with(FileContext::default).set_dir(dir);
                self.report = true;
            }
            Builtin::Suffix => {
                let suffix = need(tokens, cmd, "suffix")?;
                self.file
                    .get_or_insert_with(FileContext::default)
                    .set_suffix(&suffix);
                self.report = true;
            }
            Builtin::Encode => {
                let encoded = self.map.encode().map_err(RunError::command(cmd))?;
                writeln!(self.out, "{encoded}")?;
                self.report = false;
            }
            Builtin::Filename => {
                let path = self.filename(cmd)?;
                writeln!(self.out, "{}", path.display())?;
                self.report = false;
            }
            Builtin::Compare => {
                let (original, path) = self.original_and_new(cmd)?;
                if original != path {
                    writeln!(self.out, "{}", original.display())?;
                    writeln!(self.out, "{}", path.display())?;
                }
                self.report = false;
            }
            Builtin::Rename => {
                let (original, path) = self.original_and_new(cmd)?;
                if original != path {
                    self.renamer.rename(&original, &path)?;
                }
                self.report = false;
            }
            Builtin::Uri => {
                for uri in self.map.uri() {
                    writeln!(self.out, "{uri}")?;
                }
                self.report = false;
            }
            Builtin::Url => {
                for url in self.map.url() {
                    writeln!(self.out, "{url}")?;
                }
                self.report = false;
            }
            Builtin::Quiet => self.report = false,
            Builtin::Help => self.help(tokens)?,
            Builtin::Factory => self.select_in(RegistryKind::Factory, cmd, tokens)?,
            Builtin::Encoder => self.select_in(RegistryKind::Encoder, cmd, tokens)?,
            Builtin::Decoder => self.select_in(RegistryKind::Decoder, cmd, tokens)?,
            Builtin::Mode => self.select_in(RegistryKind::Mode, cmd, tokens)?,
        }
        Ok(())
    }

    fn select_in(
        &mut self,
        kind: RegistryKind,
        cmd: &str,
        tokens: &mut dyn Iterator<Item = String>,
    ) -> Result<()> {
        let name = need(tokens, cmd, kind.as_str())?;
        self.map
            .registries()
            .select(kind, &name)
            .map_err(RunError::command(cmd))
    }

    /// A registry shortcut: the command name is the entry to select.
    fn select(&mut self, selection: Selection, name: &str) -> Result<()> {
        let registries = self.map.registries();
        for kind in selection.registries() {
            if registries.contains(*kind, name) {
                registries
                    .select(*kind, name)
                    .map_err(RunError::command(name))?;
            }
        }
        Ok(())
    }

    fn help(&mut self, tokens: &mut dyn Iterator<Item = String>) -> Result<()> {
        // `help` takes the rest of the line as command names.
        let names: Vec<String> = tokens.collect();
        let mut helped = false;
        for name in names {
            match command::lookup(&name) {
                Some(spec) => {
                    write!(self.out, "{}", spec.help())?;
                    helped = true;
                }
                None => {
                    writeln!(self.out, "No help available for {name}\n")?;
                    helped = false;
                    break;
                }
            }
        }
        if !helped {
            write!(self.out, "{}", command::listing())?;
        }
        Ok(())
    }

    /// The current state as printed at the end of a run.
    fn current(&self) -> Result<String> {
        match self.file {
            Some(_) => Ok(self.filename("report")?.display().to_string()),
            None => self.map.encode().map_err(RunError::command("report")),
        }
    }

    fn filename(&self, cmd: &str) -> Result<PathBuf> {
        let encoded = self.map.encode().map_err(RunError::command(cmd))?;
        Ok(match &self.file {
            Some(file) => file.path(&encoded),
            None => PathBuf::from(encoded),
        })
    }

    fn original_and_new(&self, cmd: &str) -> Result<(PathBuf, PathBuf)> {
        let original = self
            .file
            .as_ref()
            .and_then(FileContext::original)
            .map(PathBuf::from)
            .ok_or_else(|| RunError::NoFile {
                command: cmd.to_string(),
            })?;
        Ok((original, self.filename(cmd)?))
    }
}

impl Runner<std::io::Stdout> {
    /// A runner printing to standard output.
    pub fn stdout(registries: Registries) -> Self {
        Runner::new(registries, std::io::stdout())
    }
}

fn need(
    tokens: &mut dyn Iterator<Item = String>,
    cmd: &str,
    expected: &'static str,
) -> Result<String> {
    tokens.next().ok_or_else(|| RunError::MissingArgument {
        command: cmd.to_string(),
        expected,
    })
}
