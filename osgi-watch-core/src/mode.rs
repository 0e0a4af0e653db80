//! Project type detection from marker files.

use std::fmt;
use std::path::Path;

use crate::category::Category;

pub const GRADLE_MARKER: &str = "build.gradle";
pub const ANT_MARKER: &str = "build.xml";

/// The kind of project found in the working directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectMode {
    /// A Gradle-built OSGi module.
    OsgiGradle,
    /// An Ant-built legacy WAR plugin.
    LegacyAnt,
    /// Neither marker file was found.
    None,
}

impl ProjectMode {
    /// Detects the project type in `dir`. `build.gradle` wins over
    /// `build.xml` when both exist.
    pub fn detect(dir: &Path) -> Self {
        if dir.join(GRADLE_MARKER).is_file() {
            ProjectMode::OsgiGradle
        } else if dir.join(ANT_MARKER).is_file() {
            ProjectMode::LegacyAnt
        } else {
            ProjectMode::None
        }
    }

    /// Tasks that make up a full build for this project type.
    pub fn build_categories(&self) -> &'static [Category] {
        match self {
            ProjectMode::OsgiGradle => &Category::ALL,
            ProjectMode::LegacyAnt => &[
                Category::Java,
                Category::JavaScript,
                Category::Jsp,
                Category::Sass,
            ],
            ProjectMode::None => &[],
        }
    }

    #[inline]
    pub fn supports(&self, category: Category) -> bool {
        self.build_categories().contains(&category)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectMode::OsgiGradle => "OSGi",
            ProjectMode::LegacyAnt => "legacy WAR",
            ProjectMode::None => "unknown",
        }
    }
}

impl fmt::Display for ProjectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
