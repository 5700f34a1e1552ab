// Const misuse stripper (scan-based)
//
// Widgets like Text/Icon often carry theme colors or interpolated strings,
// which makes a leading `const` invalid. Remove `const` only when it sits
// directly before a targeted constructor call: `const Text(` → `Text(`,
// `child: const Icon(` → `child: Icon(`. `const TextStyle(` is untouched.

use super::{FixOutcome, ScanFixer};
use anyhow::{bail, Context, Result};
use regex::Regex;

pub const DEFAULT_TARGETS: [&str; 2] = ["Text", "Icon"];

pub struct ConstMisuseStripper {
    targets: Vec<String>,
    pattern: Regex,
}

impl ConstMisuseStripper {
    pub fn new<S: AsRef<str>>(targets: &[S]) -> Result<Self> {
        if targets.is_empty() {
            bail!("at least one constructor name is required");
        }

        let mut names = Vec::with_capacity(targets.len());
        for target in targets {
            let name = target.as_ref().trim();
            let valid = name
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
            if !valid {
                bail!("not a constructor name: {:?}", name);
            }
            names.push(name.to_string());
        }

        let alternatives = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\bconst\s+((?:{})\s*\()", alternatives))
            .context("Failed to build const-misuse pattern")?;

        Ok(ConstMisuseStripper {
            targets: names,
            pattern,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(&DEFAULT_TARGETS)
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }
}

impl ScanFixer for ConstMisuseStripper {
    fn name(&self) -> &'static str {
        "const-misuse"
    }

    fn fix(&self, text: &str) -> FixOutcome {
        let applied = self.pattern.find_iter(text).count();
        if applied == 0 {
            return FixOutcome::unchanged(text);
        }

        FixOutcome {
            text: self.pattern.replace_all(text, "$1").into_owned(),
            applied,
            notes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_targeted_constructors() {
        let fixer = ConstMisuseStripper::with_defaults().unwrap();
        let text = "children: [\n  const Text('a'),\n  child: const Icon(Icons.add),\n  const  Text ('b'),\n]\n";
        let outcome = fixer.fix(text);

        assert_eq!(outcome.applied, 3);
        assert_eq!(
            outcome.text,
            "children: [\n  Text('a'),\n  child: Icon(Icons.add),\n  Text ('b'),\n]\n"
        );
    }

    #[test]
    fn test_never_touches_other_consts() {
        let fixer = ConstMisuseStripper::with_defaults().unwrap();
        let text = "const TextStyle(fontSize: 12);\n\
                    const SizedBox(height: 8);\n\
                    const IconData(0xe000);\n\
                    static const String title = 'Text(';\n\
                    const EdgeInsets.all(4);\n\
                    myconst Text(x);\n";
        let outcome = fixer.fix(text);

        assert_eq!(outcome.text, text);
        assert_eq!(outcome.applied, 0);
    }

    #[test]
    fn test_custom_targets() {
        let fixer = ConstMisuseStripper::new(&["SizedBox"]).unwrap();
        let outcome = fixer.fix("const SizedBox(width: w);\nconst Text('x');\n");
        assert_eq!(outcome.text, "SizedBox(width: w);\nconst Text('x');\n");
        assert_eq!(fixer.targets(), &["SizedBox".to_string()]);
    }

    #[test]
    fn test_rejects_bad_targets() {
        assert!(ConstMisuseStripper::new::<&str>(&[]).is_err());
        assert!(ConstMisuseStripper::new(&["Text("]).is_err());
        assert!(ConstMisuseStripper::new(&["9Lives"]).is_err());
    }

    #[test]
    fn test_idempotent() {
        let fixer = ConstMisuseStripper::with_defaults().unwrap();
        let first = fixer.fix("const Text('a');\n");
        let second = fixer.fix(&first.text);
        assert_eq!(second.text, first.text);
        assert_eq!(second.applied, 0);
    }
}
