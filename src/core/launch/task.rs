// ─── Launch Task ───
// Hands control to the felis entry point inside a fresh JVM.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use super::classpath::ClassScope;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::java;

/// Fully-qualified name of the target program's entry point.
/// Expected signature: `public static void main(String[])`.
pub const ENTRY_CLASS: &str = "felis.MainKt";
/// Extra JVM options, whitespace separated, placed before `-cp`.
pub const JVM_ARGS_ENV: &str = "FELIS_JVM_ARGS";

/// Value of `felis.side` for a dedicated server.
pub const SERVER_SIDE: &str = "SERVER";

/// Configuration handed to the target program at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub remap: bool,
    pub launcher: String,
    pub side: String,
    pub mods_dir: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            remap: true,
            launcher: "felis.launcher.minecraft.MinecraftLauncher".to_string(),
            side: SERVER_SIDE.to_string(),
            mods_dir: "felis-mods".to_string(),
        }
    }
}

impl LaunchConfig {
    /// The named variables the target reads during initialization.
    pub fn system_properties(&self, classpath: &str) -> Vec<(&'static str, String)> {
        vec![
            ("felis.minecraft.remap", self.remap.to_string()),
            ("felis.launcher", self.launcher.clone()),
            ("felis.side", self.side.clone()),
            ("felis.mods", self.mods_dir.clone()),
            ("java.class.path", classpath.to_string()),
        ]
    }
}

/// Something that can run the target program's `main`.
pub trait EntryPoint {
    /// Run to completion and return the program's exit code.
    fn invoke(&self, args: &[String]) -> LauncherResult<i32>;
}

/// Runs the entry class in a child JVM whose class path is exactly the
/// scope's entries.
#[derive(Debug, Clone)]
pub struct JvmEntryPoint {
    java_bin: PathBuf,
    main_class: String,
    scope: ClassScope,
    config: LaunchConfig,
    jvm_args: Vec<String>,
    working_dir: PathBuf,
}

impl JvmEntryPoint {
    /// Resolve `main_class` in `scope`, failing with
    /// [`LauncherError::EntryPointNotFound`] when no entry provides it.
    pub fn resolve(
        scope: ClassScope,
        main_class: &str,
        config: LaunchConfig,
        working_dir: &Path,
    ) -> LauncherResult<Self> {
        let provider = scope
            .locate(main_class)
            .ok_or_else(|| LauncherError::EntryPointNotFound(main_class.to_string()))?;
        debug!("{} provided by {:?}", main_class, provider);

        Ok(Self {
            java_bin: java::find_java_binary(),
            main_class: main_class.to_string(),
            scope,
            config,
            jvm_args: jvm_args_from_env(),
            working_dir: working_dir.to_path_buf(),
        })
    }

    pub fn with_java_bin(mut self, java_bin: impl Into<PathBuf>) -> Self {
        self.java_bin = java_bin.into();
        self
    }

    pub fn with_jvm_args(mut self, jvm_args: Vec<String>) -> Self {
        self.jvm_args = jvm_args;
        self
    }

    pub fn command(&self, args: &[String]) -> Command {
        let classpath = self.scope.to_classpath_string();
        let mut cmd = Command::new(&self.java_bin);

        cmd.args(&self.jvm_args);
        for (name, value) in self.config.system_properties(&classpath) {
            // Carried by -cp; the JVM derives java.class.path from it.
            if name == "java.class.path" {
                continue;
            }
            cmd.arg(format!("-D{}={}", name, value));
        }
        cmd.arg("-cp").arg(&classpath);
        cmd.arg(&self.main_class);
        cmd.args(args);

        // Only the assembled classpath is visible to the child.
        cmd.env_remove("CLASSPATH");
        cmd.current_dir(&self.working_dir);
        cmd
    }
}

impl EntryPoint for JvmEntryPoint {
    fn invoke(&self, args: &[String]) -> LauncherResult<i32> {
        let mut cmd = self.command(args);

        info!("Launching {} with Java: {:?}", self.main_class, self.java_bin);
        debug!("Command (copy/paste): {}", format_command_for_logs(&cmd));

        let status = cmd
            .status()
            .map_err(|e| LauncherError::JavaExecution(format!("{:?}: {}", self.java_bin, e)))?;

        match status.code() {
            Some(code) => Ok(code),
            None => {
                warn!("{} terminated without an exit code ({})", self.main_class, status);
                Ok(1)
            }
        }
    }
}

/// Launch [`ENTRY_CLASS`] from `classpath` and wait for it to finish.
pub fn launch(
    classpath: Vec<PathBuf>,
    config: LaunchConfig,
    working_dir: &Path,
) -> LauncherResult<i32> {
    let scope = ClassScope::new(classpath);
    let entry = JvmEntryPoint::resolve(scope, ENTRY_CLASS, config, working_dir)?;
    entry.invoke(&[])
}

fn jvm_args_from_env() -> Vec<String> {
    std::env::var(JVM_ARGS_ENV)
        .map(|raw| split_jvm_args(&raw))
        .unwrap_or_default()
}

fn split_jvm_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

fn format_command_for_logs(cmd: &Command) -> String {
    let program = shell_escape(&cmd.get_program().to_string_lossy());
    let args = cmd
        .get_args()
        .map(|arg| shell_escape(&arg.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ");

    if args.is_empty() {
        program
    } else {
        format!("{} {}", program, args)
    }
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::launch::classpath::get_classpath_separator;
    use crate::core::test_support::write_zip;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn felis_jar(dir: &Path) -> PathBuf {
        let jar = dir.join("felis.jar");
        write_zip(&jar, &[("felis/MainKt.class", b"\xca\xfe\xba\xbe")]);
        jar
    }

    #[test]
    fn default_config_exposes_fixed_properties() {
        let props = LaunchConfig::default().system_properties("a.jar:b.jar");
        assert_eq!(
            props,
            vec![
                ("felis.minecraft.remap", "true".to_string()),
                (
                    "felis.launcher",
                    "felis.launcher.minecraft.MinecraftLauncher".to_string()
                ),
                ("felis.side", "SERVER".to_string()),
                ("felis.mods", "felis-mods".to_string()),
                ("java.class.path", "a.jar:b.jar".to_string()),
            ]
        );
    }

    #[test]
    fn missing_entry_class_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let jar = temp.path().join("other.jar");
        write_zip(&jar, &[("net/minecraft/Main.class", b"x")]);

        let err = launch(vec![jar], LaunchConfig::default(), temp.path()).unwrap_err();
        assert!(matches!(err, LauncherError::EntryPointNotFound(ref c) if c == ENTRY_CLASS));
    }

    #[test]
    fn command_layout() {
        let temp = tempfile::tempdir().unwrap();
        let jar = felis_jar(temp.path());
        let lib = temp.path().join("lib.jar");
        write_zip(&lib, &[("x/Y.class", b"y")]);

        let entry = JvmEntryPoint::resolve(
            ClassScope::new(vec![jar.clone(), lib.clone()]),
            ENTRY_CLASS,
            LaunchConfig::default(),
            temp.path(),
        )
        .unwrap()
        .with_java_bin("/opt/jdk/bin/java")
        .with_jvm_args(vec!["-Xmx2G".into()]);

        let cmd = entry.command(&["nogui".to_string()]);
        let args = args_of(&cmd);
        let classpath = ClassScope::new(vec![jar, lib]).to_classpath_string();

        assert_eq!(cmd.get_program(), "/opt/jdk/bin/java");
        assert_eq!(
            args,
            vec![
                "-Xmx2G".to_string(),
                "-Dfelis.minecraft.remap=true".to_string(),
                "-Dfelis.launcher=felis.launcher.minecraft.MinecraftLauncher".to_string(),
                "-Dfelis.side=SERVER".to_string(),
                "-Dfelis.mods=felis-mods".to_string(),
                "-cp".to_string(),
                classpath.clone(),
                ENTRY_CLASS.to_string(),
                "nogui".to_string(),
            ]
        );
        assert_eq!(classpath.split(get_classpath_separator()).count(), 2);
        assert_eq!(cmd.get_current_dir(), Some(temp.path()));
        assert!(cmd
            .get_envs()
            .any(|(key, value)| key == "CLASSPATH" && value.is_none()));
    }

    #[test]
    fn jvm_args_split_on_whitespace() {
        assert_eq!(
            split_jvm_args("  -Xmx4G\t-XX:+UseG1GC \n"),
            vec!["-Xmx4G", "-XX:+UseG1GC"]
        );
        assert!(split_jvm_args("   ").is_empty());
    }

    #[test]
    fn unrunnable_java_is_an_execution_error() {
        let temp = tempfile::tempdir().unwrap();
        let entry = JvmEntryPoint::resolve(
            ClassScope::new(vec![felis_jar(temp.path())]),
            ENTRY_CLASS,
            LaunchConfig::default(),
            temp.path(),
        )
        .unwrap()
        .with_java_bin(temp.path().join("no-such-java"));

        let err = entry.invoke(&[]).unwrap_err();
        assert!(matches!(err, LauncherError::JavaExecution(_)));
    }

    #[cfg(unix)]
    #[test]
    fn invoke_returns_child_exit_code() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let fake_java = temp.path().join("java");
        let record = temp.path().join("args.txt");
        std::fs::write(
            &fake_java,
            format!("#!/bin/sh\necho \"$@\" > '{}'\nexit 7\n", record.display()),
        )
        .unwrap();
        std::fs::set_permissions(&fake_java, std::fs::Permissions::from_mode(0o755)).unwrap();

        let entry = JvmEntryPoint::resolve(
            ClassScope::new(vec![felis_jar(temp.path())]),
            ENTRY_CLASS,
            LaunchConfig::default(),
            temp.path(),
        )
        .unwrap()
        .with_java_bin(&fake_java)
        .with_jvm_args(vec![]);

        assert_eq!(entry.invoke(&[]).unwrap(), 7);
        let recorded = std::fs::read_to_string(&record).unwrap();
        assert!(recorded.contains("-Dfelis.side=SERVER"));
        assert!(recorded.trim_end().ends_with(ENTRY_CLASS));
    }

    #[test]
    fn shell_escape_quotes_when_needed() {
        assert_eq!(shell_escape("-cp"), "-cp");
        assert_eq!(shell_escape("a b"), "\"a b\"");
        assert_eq!(shell_escape(""), "\"\"");
    }
}
