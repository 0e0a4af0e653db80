#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use osgi_watch_core::{Config, Context, Error, Invocation, Notifier, ProjectMode, Result, ToolRunner};

/// Records every invocation instead of running it.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    report: String,
    failing: Vec<String>,
    panicking: Vec<String>,
    delay: Duration,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output returned for `gradle dependencies`.
    pub fn with_report(mut self, report: &str) -> Self {
        self.report = report.to_string();
        self
    }

    /// Panics on every invocation of the task `task`.
    pub fn panicking_on(mut self, task: &str) -> Self {
        self.panicking.push(task.to_string());
        self
    }

    /// Makes every invocation take `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fails every invocation whose arguments contain `arg`.
    pub fn failing_on(mut self, arg: &str) -> Self {
        self.failing.push(arg.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Invocations carrying `arg` anywhere, including `-x` exclusions.
    pub fn calls_with(&self, arg: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.args.iter().any(|a| a == arg))
            .count()
    }

    /// Invocations whose first argument is the task `task`.
    pub fn calls_to(&self, task: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.args.first().map(String::as_str) == Some(task))
            .count()
    }
}

#[async_trait]
impl ToolRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<String> {
        self.calls.lock().unwrap().push(invocation.clone());
        if let Some(task) = invocation.args.first() {
            if self.panicking.contains(task) {
                panic!("{} crashed", task);
            }
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if invocation.args.iter().any(|arg| self.failing.contains(arg)) {
            return Err(Error::ToolFailed {
                program: invocation.program.clone(),
                status: "exit status: 1".to_string(),
                output: "error: cannot find symbol".to_string(),
            });
        }
        if invocation.args.first().map(String::as_str) == Some("dependencies") {
            return Ok(self.report.clone());
        }
        Ok(String::new())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

pub const GRADLE_REPORT: &str = "\
compile - Dependencies for source set 'main'.
+--- com.liferay.portal:com.liferay.portal.kernel:2.0.0
+--- project :modules:foo-api
|    \\--- project :modules:foo-util
\\--- project :modules:foo-util (*)
";

pub fn context(root: &Path, mode: ProjectMode, runner: Arc<RecordingRunner>) -> Arc<Context> {
    Arc::new(Context::new(root, mode, Config::defaults_for(mode), runner))
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}
