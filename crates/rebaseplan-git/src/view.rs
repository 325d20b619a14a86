//! History views opened after the rebase markers are in place.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// `git log --graph` in the terminal.
    Text,
    /// `gitk`.
    Gitk,
}

#[derive(Debug, Clone)]
pub struct LogView {
    pub viewer: Viewer,
    /// Show every commit instead of only decorated ones.
    pub verbose: bool,
    /// Hide decorations of this remote's branches.
    pub hide_remote: Option<String>,
    /// Appended verbatim after the generated flags.
    pub extra_args: Vec<String>,
    pub main: String,
    pub upstream: String,
    pub branches: Vec<String>,
}

impl LogView {
    /// Program and arguments for this view.
    pub fn command(&self) -> (&'static str, Vec<String>) {
        let (program, mut args): (&'static str, Vec<String>) = match self.viewer {
            Viewer::Text => (
                "git",
                ["log", "--oneline", "--decorate", "--color", "--graph", "--boundary"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            Viewer::Gitk => ("gitk", vec!["--boundary".to_string()]),
        };
        if !self.verbose {
            args.push("--simplify-by-decoration".to_string());
        }
        if let Some(remote) = &self.hide_remote {
            args.push(format!("--decorate-refs-exclude=remotes/{remote}/*"));
        }
        args.extend(self.extra_args.iter().cloned());
        args.push(format!("^{}^", self.main));
        args.push(format!("^{}/{}^", self.upstream, self.main));
        args.extend(self.branches.iter().cloned());
        (program, args)
    }
}
