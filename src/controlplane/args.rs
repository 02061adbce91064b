//! Command line editing shared by the control plane and kubelet mutations.

use std::sync::LazyLock;

use regex::Regex;

static LINE_CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\\\n]+").expect("line continuation pattern is valid"));

/// Editable command line of a container or systemd unit.
///
/// Flags are addressed by prefix (e.g., `--cloud-provider=`), so every edit
/// replaces an existing occurrence in place or appends a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    /// Parses a command line spread over continuation lines (`\` + newline).
    pub fn parse(s: &str) -> Self {
        let joined = LINE_CONTINUATION.replace_all(s, "");
        Self {
            args: joined.split_whitespace().map(String::from).collect(),
        }
    }

    fn position(&self, prefix: &str) -> Option<usize> {
        self.args.iter().position(|arg| arg.starts_with(prefix))
    }

    /// Sets the flag starting with `prefix` to `value`.
    pub fn ensure_flag(&mut self, prefix: &str, value: &str) {
        let arg = format!("{}{}", prefix, value);
        match self.position(prefix) {
            Some(i) => self.args[i] = arg,
            None => self.args.push(arg),
        }
    }

    /// Adds `item` to the `sep`-separated list of the flag starting with `prefix`.
    pub fn ensure_flag_contains(&mut self, prefix: &str, item: &str, sep: &str) {
        match self.position(prefix) {
            Some(i) => {
                let current = &self.args[i][prefix.len()..];
                if current.split(sep).any(|v| v == item) {
                    return;
                }
                self.args[i] = if current.is_empty() {
                    format!("{}{}", prefix, item)
                } else {
                    format!("{}{}{}{}", prefix, current, sep, item)
                };
            }
            None => self.args.push(format!("{}{}", prefix, item)),
        }
    }

    /// Removes `item` from the `sep`-separated list of the flag starting with `prefix`.
    ///
    /// The flag itself stays, possibly with an empty list.
    pub fn ensure_no_flag_contains(&mut self, prefix: &str, item: &str, sep: &str) {
        let Some(i) = self.position(prefix) else {
            return;
        };
        let values: Vec<&str> = self.args[i][prefix.len()..].split(sep).collect();
        if !values.contains(&item) {
            return;
        }
        let kept: Vec<&str> = values.into_iter().filter(|v| *v != item).collect();
        self.args[i] = format!("{}{}", prefix, kept.join(sep));
    }

    /// Renders the command line with the first `head` words on one line and
    /// every following word joined by `sep`.
    pub fn serialize(&self, head: usize, sep: &str) -> String {
        if self.args.len() <= head {
            return self.args.join(" ");
        }
        if head == 0 {
            return self.args.join(sep);
        }
        format!("{} {}", self.args[..head].join(" "), self.args[head..].join(sep))
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn into_args(self) -> Vec<String> {
        self.args
    }
}
