//! Skill-specific checks.

pub mod manifest;

pub use manifest::{SKILL_FILE, SkillFrontmatter, SkillManifest, validate_skill_dir};
