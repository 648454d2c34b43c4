use clap::Command;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::errors::{HarnessError, Result};

/// Groups used when listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Core,
    Lint,
    Conformance,
}

impl CommandCategory {
    /// Returns all category variants in display order.
    pub fn all() -> &'static [CommandCategory] {
        &[
            CommandCategory::Core,
            CommandCategory::Lint,
            CommandCategory::Conformance,
        ]
    }
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandCategory::Core => write!(f, "core"),
            CommandCategory::Lint => write!(f, "lint"),
            CommandCategory::Conformance => write!(f, "conformance"),
        }
    }
}

/// Metadata for a registered command.
#[derive(Debug, Clone)]
pub struct CommandMeta {
    pub name: String,
    pub category: CommandCategory,
    pub description: String,
    pub aliases: Vec<String>,
    pub command: Command,
}

/// Centralized command registration and categorization system.
pub struct CommandRegistry {
    commands: HashMap<String, CommandMeta>,
    root: Command,
}

impl CommandRegistry {
    /// Creates a new registry with the given root command.
    pub fn new(root: Command) -> Self {
        Self {
            commands: HashMap::new(),
            root,
        }
    }

    /// Registers a command. Returns an error if a command with the same name already exists.
    pub fn register(&mut self, meta: CommandMeta) -> Result<()> {
        if self.commands.contains_key(&meta.name) {
            return Err(HarnessError::Command(format!(
                "duplicate command name: {}",
                meta.name
            )));
        }
        self.commands.insert(meta.name.clone(), meta);
        Ok(())
    }

    /// Returns all commands in the given category, sorted by name.
    pub fn get_by_category(&self, cat: CommandCategory) -> Vec<&CommandMeta> {
        let mut cmds: Vec<&CommandMeta> = self
            .commands
            .values()
            .filter(|m| m.category == cat)
            .collect();
        cmds.sort_by(|a, b| a.name.cmp(&b.name));
        cmds
    }

    /// Human-readable listing of commands grouped by category.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for cat in CommandCategory::all() {
            let cmds = self.get_by_category(*cat);
            if cmds.is_empty() {
                continue;
            }
            out.push_str(&format!("{}:\n", cat));
            for cmd in cmds {
                let aliases = if cmd.aliases.is_empty() {
                    String::new()
                } else {
                    format!(" (aliases: {})", cmd.aliases.join(", "))
                };
                out.push_str(&format!("  {:<12} {}{}\n", cmd.name, cmd.description, aliases));
            }
        }
        out
    }

    /// JSON listing of commands grouped by category.
    pub fn listing_json(&self) -> Result<String> {
        let mut output: BTreeMap<String, Vec<CommandJsonEntry>> = BTreeMap::new();
        for cat in CommandCategory::all() {
            let cmds = self.get_by_category(*cat);
            if cmds.is_empty() {
                continue;
            }
            let entries = cmds
                .iter()
                .map(|m| CommandJsonEntry {
                    name: m.name.clone(),
                    description: m.description.clone(),
                    aliases: m.aliases.clone(),
                })
                .collect();
            output.insert(cat.to_string(), entries);
        }
        Ok(serde_json::to_string_pretty(&output)?)
    }

    /// Consumes the registry and builds the final clap Command with all subcommands attached.
    pub fn build_root(self) -> Command {
        let mut metas: Vec<CommandMeta> = self.commands.into_values().collect();
        metas.sort_by(|a, b| a.name.cmp(&b.name));
        let mut root = self.root;
        for meta in metas {
            root = root.subcommand(meta.command.visible_aliases(meta.aliases));
        }
        root
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns a sorted list of all registered command names.
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns true if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug, Serialize)]
struct CommandJsonEntry {
    name: String,
    description: String,
    aliases: Vec<String>,
}

/// Builder for constructing `CommandMeta` instances.
pub struct CommandBuilder {
    name: String,
    category: Option<CommandCategory>,
    description: String,
    aliases: Vec<String>,
    command: Option<Command>,
}

impl CommandBuilder {
    /// Creates a builder from an existing clap Command, extracting name and description.
    pub fn from_clap(cmd: Command) -> Self {
        let name = cmd.get_name().to_string();
        let description = cmd
            .get_about()
            .map(|s| s.to_string())
            .unwrap_or_default();
        Self {
            name,
            category: None,
            description,
            aliases: Vec::new(),
            command: Some(cmd),
        }
    }

    pub fn category(mut self, cat: CommandCategory) -> Self {
        self.category = Some(cat);
        self
    }

    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Builds the `CommandMeta`. Defaults category to `Core` if not set.
    pub fn build(self) -> CommandMeta {
        let category = self.category.unwrap_or(CommandCategory::Core);
        let command = self
            .command
            .unwrap_or_else(|| Command::new(self.name.clone()).about(self.description.clone()));

        CommandMeta {
            name: self.name,
            category,
            description: self.description,
            aliases: self.aliases,
            command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_root() -> Command {
        Command::new("searchmodal")
    }

    fn make_meta(name: &str, cat: CommandCategory) -> CommandMeta {
        CommandBuilder::from_clap(Command::new(name.to_string()).about(format!("{} command", name)))
            .category(cat)
            .build()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut reg = CommandRegistry::new(make_root());
        reg.register(make_meta("version", CommandCategory::Core)).unwrap();
        reg.register(make_meta("config", CommandCategory::Core)).unwrap();
        reg.register(make_meta("lint", CommandCategory::Lint)).unwrap();

        assert_eq!(reg.len(), 3);
        assert!(!reg.is_empty());

        let core = reg.get_by_category(CommandCategory::Core);
        let names: Vec<&str> = core.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["config", "version"]);

        let lint = reg.get_by_category(CommandCategory::Lint);
        assert_eq!(lint.len(), 1);
        assert_eq!(lint[0].name, "lint");
        assert!(reg.get_by_category(CommandCategory::Conformance).is_empty());
    }

    #[test]
    fn test_duplicate_detection() {
        let mut reg = CommandRegistry::new(make_root());
        reg.register(make_meta("version", CommandCategory::Core)).unwrap();
        let result = reg.register(make_meta("version", CommandCategory::Core));
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("duplicate"));
    }

    #[test]
    fn test_builder_from_clap() {
        let cmd = Command::new("scenario").about("Replay conformance flows");
        let meta = CommandBuilder::from_clap(cmd)
            .category(CommandCategory::Conformance)
            .aliases(&["sc"])
            .build();

        assert_eq!(meta.name, "scenario");
        assert_eq!(meta.description, "Replay conformance flows");
        assert_eq!(meta.aliases, vec!["sc"]);
        assert_eq!(meta.category, CommandCategory::Conformance);
    }

    #[test]
    fn test_builder_defaults_to_core() {
        let meta = CommandBuilder::from_clap(Command::new("x")).build();
        assert_eq!(meta.category, CommandCategory::Core);
        assert!(meta.description.is_empty());
        assert!(meta.aliases.is_empty());
    }

    #[test]
    fn test_listing_groups_by_category() {
        let mut reg = CommandRegistry::new(make_root());
        reg.register(make_meta("lint", CommandCategory::Lint)).unwrap();
        reg.register(make_meta("version", CommandCategory::Core)).unwrap();

        let text = reg.listing();
        let core_at = text.find("core:").unwrap();
        let lint_at = text.find("lint:").unwrap();
        assert!(core_at < lint_at);
        assert!(!text.contains("conformance:"));

        let json: serde_json::Value = serde_json::from_str(&reg.listing_json().unwrap()).unwrap();
        assert_eq!(json["lint"][0]["name"], "lint");
        assert!(json.get("conformance").is_none());
    }

    #[test]
    fn test_build_root_attaches_subcommands_and_aliases() {
        let mut reg = CommandRegistry::new(make_root());
        reg.register(make_meta("version", CommandCategory::Core)).unwrap();
        reg.register(
            CommandBuilder::from_clap(Command::new("config"))
                .aliases(&["conf"])
                .build(),
        )
        .unwrap();
        assert_eq!(reg.command_names(), vec!["config", "version"]);

        let root = reg.build_root();
        let matches = root.try_get_matches_from(["searchmodal", "conf"]).unwrap();
        assert_eq!(matches.subcommand_name(), Some("config"));
    }
}
