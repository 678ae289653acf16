//! SKILL.md frontmatter checks.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::validation::ValidationError;

pub const SKILL_FILE: &str = "SKILL.md";

const MAX_SKILL_NAME: usize = 64;
const MAX_DESCRIPTION: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillManifest {
    pub name: String,
    pub description: String,
}

/// The YAML block at the top of SKILL.md. Other keys (license,
/// allowed-tools, ...) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct SkillFrontmatter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Split off the leading `---` block and deserialize it as YAML.
pub fn parse_frontmatter(content: &str) -> Result<SkillFrontmatter, ValidationError> {
    let missing = || ValidationError::SkillManifest("missing frontmatter".to_string());

    let mut lines = content.lines();
    if lines.next().map(str::trim_end) != Some("---") {
        return Err(missing());
    }

    let mut yaml = String::new();
    let mut closed = false;
    for line in lines {
        if line.trim_end() == "---" {
            closed = true;
            break;
        }
        yaml.push_str(line);
        yaml.push('\n');
    }
    if !closed {
        return Err(missing());
    }
    if yaml.trim().is_empty() {
        return Ok(SkillFrontmatter::default());
    }

    serde_yaml::from_str(&yaml)
        .map_err(|e| ValidationError::SkillManifest(format!("invalid YAML frontmatter: {e}")))
}

fn is_kebab_case(name: &str) -> bool {
    !name.is_empty()
        && name.split('-').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

/// Check frontmatter fields against the skill naming rules.
///
/// `dir_name` is the directory the skill is installed under.
pub fn check_manifest(
    frontmatter: &SkillFrontmatter,
    dir_name: &str,
) -> Result<SkillManifest, ValidationError> {
    let invalid = |reason: String| ValidationError::SkillManifest(reason);

    let name = frontmatter
        .name
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| invalid("missing 'name' in frontmatter".into()))?;
    let description = frontmatter
        .description
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| invalid("missing 'description' in frontmatter".into()))?;

    if !is_kebab_case(name) {
        return Err(invalid(format!("invalid name format: {name}")));
    }
    if name.chars().count() > MAX_SKILL_NAME {
        return Err(invalid(format!("name must be 1-{MAX_SKILL_NAME} characters")));
    }
    if name != dir_name {
        return Err(invalid(format!(
            "skill name '{name}' does not match directory name '{dir_name}'"
        )));
    }
    if description.chars().count() > MAX_DESCRIPTION {
        return Err(invalid(format!(
            "description must be 1-{MAX_DESCRIPTION} characters"
        )));
    }

    Ok(SkillManifest {
        name: name.to_string(),
        description: description.to_string(),
    })
}

/// Read and validate `<dir>/SKILL.md`.
pub fn validate_skill_dir(dir: &Path) -> anyhow::Result<SkillManifest> {
    let skill_file = dir.join(SKILL_FILE);
    let content = std::fs::read_to_string(&skill_file)
        .with_context(|| format!("Failed to read {}", skill_file.display()))?;

    let dir_name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid skill directory: {}", dir.display()))?;

    let frontmatter = parse_frontmatter(&content)?;
    Ok(check_manifest(&frontmatter, dir_name)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "---\nname: frontend-design\ndescription: \"Build polished UIs: layout, color\"\nlicense: MIT\n---\n\n# Body\n";

    #[test]
    fn parses_frontmatter_fields() {
        let frontmatter = parse_frontmatter(VALID).unwrap();
        assert_eq!(frontmatter.name.as_deref(), Some("frontend-design"));
        assert_eq!(
            frontmatter.description.as_deref(),
            Some("Build polished UIs: layout, color")
        );
    }

    #[test]
    fn missing_frontmatter_is_rejected() {
        assert!(parse_frontmatter("# Just markdown").is_err());
        assert!(parse_frontmatter("---\nname: x\n").is_err());
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let err = parse_frontmatter("---\nname: [unclosed\n---\n").unwrap_err();
        assert!(err.to_string().contains("invalid YAML frontmatter"));
    }

    #[test]
    fn empty_block_reports_missing_name() {
        let frontmatter = parse_frontmatter("---\n---\n").unwrap();
        let err = check_manifest(&frontmatter, "x").unwrap_err();
        assert!(err.to_string().contains("missing 'name'"));
    }

    #[test]
    fn accepts_matching_directory() {
        let frontmatter = parse_frontmatter(VALID).unwrap();
        let manifest = check_manifest(&frontmatter, "frontend-design").unwrap();
        assert_eq!(manifest.name, "frontend-design");
    }

    #[test]
    fn quoted_scalars_and_folded_description() {
        let content = "---\nname: \"frontend-design\"\ndescription: >\n  Builds polished\n  interfaces.\n---\n";
        let frontmatter = parse_frontmatter(content).unwrap();

        let manifest = check_manifest(&frontmatter, "frontend-design").unwrap();

        assert_eq!(manifest.name, "frontend-design");
        assert_eq!(manifest.description, "Builds polished interfaces.");
    }

    #[test]
    fn rejects_directory_mismatch() {
        let frontmatter = parse_frontmatter(VALID).unwrap();
        let err = check_manifest(&frontmatter, "other").unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn rejects_bad_name_format() {
        for name in ["Frontend", "front_end", "-lead", "trail-", "a--b"] {
            let content = format!("---\nname: \"{name}\"\ndescription: d\n---\n");
            let frontmatter = parse_frontmatter(&content).unwrap();
            assert!(check_manifest(&frontmatter, name).is_err(), "{name} should fail");
        }
    }

    #[test]
    fn rejects_long_description() {
        let content = format!("---\nname: a\ndescription: {}\n---\n", "x".repeat(1025));
        let frontmatter = parse_frontmatter(&content).unwrap();
        assert!(check_manifest(&frontmatter, "a").is_err());
    }

    #[test]
    fn validates_directory_on_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("frontend-design");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(SKILL_FILE),
            "---\nname: \"frontend-design\"\ndescription: 'Builds UIs'\n---\n",
        )
        .unwrap();

        let manifest = validate_skill_dir(&dir).unwrap();
        assert_eq!(manifest.name, "frontend-design");
        assert_eq!(manifest.description, "Builds UIs");
    }
}
