//! Install script rendering for a build's installation groups.

use crate::{entity::build::InstallStep, sv::version::DEFAULT_JAVA};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
  Bash,
  PowerShell,
}

impl Shell {
  fn echo(self) -> &'static str {
    match self {
      Self::Bash => "echo",
      Self::PowerShell => "Write-Host",
    }
  }
}

/// `path.dirname`: `server.jar` lives in `.`, `/server.jar` in `/`.
fn dirname(file: &str) -> &str {
  match file.trim_end_matches('/').rfind('/') {
    None => ".",
    Some(0) => "/",
    Some(idx) => &file[..idx],
  }
}

/// Drops progress lines when `echo` is off. Indented PowerShell lines count
/// as progress lines too.
fn finish(shell: Shell, lines: Vec<String>, echo: bool) -> String {
  lines
    .into_iter()
    .filter(|line| echo || !line.trim_start().starts_with(shell.echo()))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn not_found(shell: Shell, echo: bool) -> String {
  let lines = match shell {
    Shell::Bash => vec!["#!/bin/bash", "", "echo \"Build not found\"", "exit 1"],
    Shell::PowerShell => vec!["Write-Host \"Build not found\"", "exit 1"],
  };
  finish(shell, lines.into_iter().map(String::from).collect(), echo)
}

pub fn render(
  shell: Shell,
  installation: &[Vec<InstallStep>],
  java: Option<i32>,
  echo: bool,
) -> String {
  let java = java.unwrap_or(DEFAULT_JAVA);
  match shell {
    Shell::Bash => bash(installation, java, echo),
    Shell::PowerShell => powershell(installation, java, echo),
  }
}

fn bash(installation: &[Vec<InstallStep>], java: i32, echo: bool) -> String {
  let mut lines = vec![
    "#!/bin/bash".to_string(),
    format!("export JAVA_VERSION={java}"),
    String::new(),
    "echo \"Installing Server\"".to_string(),
  ];

  for group in installation {
    lines.push(String::new());
    for step in group {
      match step {
        InstallStep::Remove { location } => {
          lines.push(format!("echo \"Removing {location}\""));
          lines.push(format!("rm -rf {location}"));
        }
        InstallStep::Download { file, url, .. } => {
          lines.push(format!("echo \"Downloading {file}\""));
          lines.push(format!("mkdir -p {}", dirname(file)));
          lines.push(format!("rm -f {file}"));
          lines.push(format!("curl -s -o {file} '{url}'&"));
        }
        InstallStep::Unzip { file, location } => {
          lines.push(format!("echo \"Unzipping {file}\""));
          lines.push(format!("mkdir -p {location}"));
          lines.push(format!("unzip -o {file} -d {location}&"));
        }
      }
    }
    lines.push("wait".to_string());
  }

  lines.extend([
    String::new(),
    "echo \"Installation complete\"".to_string(),
    format!("echo \"Use Java version: {java}\""),
    "exit 0".to_string(),
  ]);
  finish(Shell::Bash, lines, echo)
}

fn powershell(
  installation: &[Vec<InstallStep>],
  java: i32,
  echo: bool,
) -> String {
  let mut lines = vec![
    "Write-Host \"Installing Server\"".to_string(),
    format!("$env:JAVA_VERSION = {java}"),
  ];

  for group in installation {
    lines.push(String::new());
    lines.push("Invoke-Command {".to_string());
    for step in group {
      match step {
        InstallStep::Remove { location } => {
          lines.push(format!("  Write-Host \"Removing {location}\""));
          lines.push(format!("  Remove-Item -Recurse -Force {location}"));
        }
        InstallStep::Download { file, url, .. } => {
          lines.push(format!("  Write-Host \"Downloading {file}\""));
          lines.push(format!(
            "  New-Item -ItemType Directory -Force {}",
            dirname(file)
          ));
          lines
            .push(format!("  Invoke-WebRequest -Uri '{url}' -OutFile {file}"));
        }
        InstallStep::Unzip { file, location } => {
          lines.push(format!("  Write-Host \"Unzipping {file}\""));
          lines.push(format!("  New-Item -ItemType Directory -Force {location}"));
          lines.push(format!(
            "  Expand-Archive -Path {file} -DestinationPath {location}"
          ));
        }
      }
    }
    lines.push("}".to_string());
  }

  lines.extend([
    String::new(),
    "Write-Host \"Installation complete\"".to_string(),
    format!("Write-Host \"Use Java version: {java}\""),
    "exit 0".to_string(),
  ]);
  finish(Shell::PowerShell, lines, echo)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn installation() -> Vec<Vec<InstallStep>> {
    vec![
      vec![InstallStep::Remove { location: "libraries".into() }],
      vec![
        InstallStep::Download {
          file: "server.jar".into(),
          url: "https://example.com/server.jar".into(),
          size: 10,
        },
        InstallStep::Download {
          file: "mods/fabric-api.jar".into(),
          url: "https://example.com/api.jar".into(),
          size: 5,
        },
      ],
      vec![InstallStep::Unzip {
        file: "server.zip".into(),
        location: "data".into(),
      }],
    ]
  }

  #[test]
  fn dirname_matches_posix() {
    assert_eq!(dirname("server.jar"), ".");
    assert_eq!(dirname("mods/fabric-api.jar"), "mods");
    assert_eq!(dirname("a/b/c.jar"), "a/b");
    assert_eq!(dirname("/server.jar"), "/");
  }

  #[test]
  fn bash_groups_wait_for_their_steps() {
    let script = render(Shell::Bash, &installation(), Some(17), true);
    let lines: Vec<_> = script.lines().collect();

    assert_eq!(lines[0], "#!/bin/bash");
    assert_eq!(lines[1], "export JAVA_VERSION=17");
    assert_eq!(lines.iter().filter(|l| **l == "wait").count(), 3);
    assert!(lines.contains(&"mkdir -p mods"));
    assert!(lines.contains(&"curl -s -o server.jar 'https://example.com/server.jar'&"));
    assert!(lines.contains(&"unzip -o server.zip -d data&"));
    assert_eq!(lines.last(), Some(&"exit 0"));
  }

  #[test]
  fn echo_off_strips_progress() {
    let script = render(Shell::Bash, &installation(), None, false);
    assert!(!script.contains("echo"));
    assert!(script.contains("export JAVA_VERSION=21"));

    let script = render(Shell::PowerShell, &installation(), None, false);
    assert!(!script.contains("Write-Host"));
    assert!(script.contains("Invoke-WebRequest"));
  }

  #[test]
  fn powershell_wraps_groups() {
    let script = render(Shell::PowerShell, &installation(), Some(8), true);
    assert!(script.starts_with("Write-Host \"Installing Server\"\n$env:JAVA_VERSION = 8"));
    assert_eq!(script.matches("Invoke-Command {").count(), 3);
    assert!(script.contains("  Expand-Archive -Path server.zip -DestinationPath data"));
  }

  #[test]
  fn missing_builds_exit_non_zero() {
    assert_eq!(
      not_found(Shell::Bash, true),
      "#!/bin/bash\n\necho \"Build not found\"\nexit 1"
    );
    assert_eq!(not_found(Shell::PowerShell, false), "exit 1");
  }
}
