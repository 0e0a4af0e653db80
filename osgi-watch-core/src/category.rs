//! Artifact categories and their task names.

use std::fmt;

/// One kind of source artifact, each with its own build task and watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Java,
    JavaScript,
    JavaScriptEs6,
    Jsp,
    Sass,
    Soy,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Java,
        Category::JavaScript,
        Category::JavaScriptEs6,
        Category::Jsp,
        Category::Sass,
        Category::Soy,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Java => "java",
            Category::JavaScript => "javascript",
            Category::JavaScriptEs6 => "javascript-es6",
            Category::Jsp => "jsp",
            Category::Sass => "sass",
            Category::Soy => "soy",
        }
    }

    /// Name of the task that builds this category, e.g. `build-java`.
    pub fn build_task(&self) -> String {
        format!("build-{}", self.as_str())
    }

    /// Name of the rebuild sequence run when this category changes.
    pub fn watch_task(&self) -> String {
        format!("watch-{}", self.as_str())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let name = s.strip_prefix("build-").unwrap_or(s);
        match name.to_lowercase().as_str() {
            "java" => Some(Category::Java),
            "javascript" | "js" => Some(Category::JavaScript),
            "javascript-es6" | "es6" => Some(Category::JavaScriptEs6),
            "jsp" => Some(Category::Jsp),
            "sass" | "scss" => Some(Category::Sass),
            "soy" => Some(Category::Soy),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
