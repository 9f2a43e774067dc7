//! hash-password CLI 命令
//!
//! 生成 `auth.admin_password` 可直接使用的 Argon2id 哈希。

use std::io::{self, BufRead, IsTerminal, Write};

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::MIN_PASSWORD_LEN;
use crate::utils::password::hash_password;

/// 从不同来源获取密码
fn get_password(password: Option<String>, stdin: bool) -> Result<String, CliError> {
    if stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| CliError::CommandError(format!("Failed to read from stdin: {}", e)))?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    } else if let Some(pwd) = password {
        Ok(pwd)
    } else {
        prompt_password_with_confirm()
    }
}

/// 交互式输入密码（带确认）
fn prompt_password_with_confirm() -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::CommandError(
            "No password provided. Use --password or --stdin flag, or run interactively."
                .to_string(),
        ));
    }

    let read = |prompt: &str| -> Result<String, CliError> {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|e| CliError::CommandError(e.to_string()))?;
        rpassword::read_password()
            .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))
    };

    let password = read("Enter admin password: ")?;
    let confirm = read("Confirm password: ")?;

    if password != confirm {
        return Err(CliError::CommandError("Passwords do not match".to_string()));
    }
    Ok(password)
}

fn validate_password(password: &str) -> Result<(), CliError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CliError::ParseError(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// 运行 hash-password 命令，哈希写到 stdout
pub fn run_hash_password(password: Option<String>, stdin: bool) -> Result<(), CliError> {
    let password = get_password(password, stdin)?;
    validate_password(&password)?;

    let hashed = hash_password(&password)?;

    if io::stdout().is_terminal() {
        eprintln!(
            "{} Put this value into {}:",
            "✓".green().bold(),
            "auth.admin_password".cyan()
        );
    }
    println!("{}", hashed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long-enough").is_ok());
    }

    #[test]
    fn test_explicit_password_is_used() {
        let pwd = get_password(Some("from-flag-123".to_string()), false).unwrap();
        assert_eq!(pwd, "from-flag-123");
    }

    #[test]
    fn test_run_hash_password_with_flag() {
        assert!(run_hash_password(Some("hunter2-hunter2".to_string()), false).is_ok());
        assert!(run_hash_password(Some("tiny".to_string()), false).is_err());
    }
}
