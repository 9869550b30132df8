//! Raw command execution

use crate::console::CliConsole;
use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;
use vizport_sdk::{ArgValue, Command, Session, VizportConfig};

/// Build a command from a name and `name=value` words
pub fn build_command(name: &str, assignments: &[String]) -> Result<Command> {
    let mut command = Command::new(name);
    for assignment in assignments {
        let (arg, literal) = assignment
            .split_once('=')
            .with_context(|| format!("argument '{}' is not name=value", assignment))?;
        if command.get(arg).is_some() {
            bail!("argument '{}' given twice", arg);
        }
        command.set_arg(arg, ArgValue::from_literal(literal));
    }
    Ok(command)
}

/// Parse one script line; `None` for blank lines and `#` comments
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let assignments: Vec<String> = words.map(str::to_string).collect();
    build_command(name, &assignments).map(Some)
}

/// `vizport exec`
pub async fn exec(config: &VizportConfig, name: &str, assignments: &[String]) -> Result<()> {
    let command = build_command(name, assignments)?;
    let mut session = super::connect(config).await?;
    let fields = session.execute_command(&command).await?;
    CliConsole::new(false).print_fields(&fields);
    session.terminate().await?;
    Ok(())
}

/// Run every command line from `reader`, printing each result
///
/// Stops at the first transport or protocol failure; a command the
/// application rejects is just another result.
pub async fn run_script<R>(session: &mut Session, reader: R, console: &CliConsole) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0;
    let mut executed = 0;

    while let Some(line) = lines.next_line().await.context("reading commands")? {
        line_no += 1;
        let Some(command) = parse_line(&line).with_context(|| format!("line {}", line_no))? else {
            continue;
        };
        debug!(line = line_no, command = %command, "running script line");
        let fields = session
            .execute_command(&command)
            .await
            .with_context(|| format!("line {}: '{}'", line_no, command.name()))?;
        console.print_fields(&fields);
        executed += 1;
    }

    Ok(executed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command_types_literals() {
        let cmd = build_command(
            "saveSnapshot",
            &["saveLayout=true".to_string(), "index=3".to_string(), "saveName=a=b".to_string()],
        )
        .unwrap();
        assert_eq!(cmd.get("saveLayout"), Some(&ArgValue::Bool(true)));
        assert_eq!(cmd.get("index"), Some(&ArgValue::Int(3)));
        assert_eq!(cmd.get("saveName"), Some(&ArgValue::Text("a=b".to_string())));
    }

    #[test]
    fn test_build_command_rejects_bad_words() {
        assert!(build_command("x", &["novalue".to_string()]).is_err());
        assert!(build_command("x", &["a=1".to_string(), "a=2".to_string()]).is_err());
    }

    #[test]
    fn test_parse_line() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   # comment").unwrap().is_none());
        let cmd = parse_line("  setCustomLayout nrows=2  ncols=3 ").unwrap().unwrap();
        assert_eq!(cmd.name(), "setCustomLayout");
        assert_eq!(cmd.args().len(), 2);
    }
}
