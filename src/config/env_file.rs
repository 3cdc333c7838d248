//! Env file parsing
//!
//! `KEY=VALUE` per line. Blank lines and `#` comments are ignored, an
//! `export ` prefix is accepted, and values may be wrapped in single or
//! double quotes.

use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::ports::FileSystem;
use crate::error::{NopeusError, NopeusResult};

/// Read and parse the env file at `path`
pub fn load_env_file(fs: &dyn FileSystem, path: &Path) -> NopeusResult<BTreeMap<String, String>> {
    let content = fs.read(path)?;
    parse_env_file(&content, path)
}

/// Parse env file content; `path` is only used in error messages
pub fn parse_env_file(content: &str, path: &Path) -> NopeusResult<BTreeMap<String, String>> {
    let mut vars = BTreeMap::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line).trim_start();

        let fail = |message: &str| NopeusError::EnvFile {
            file: path.to_path_buf(),
            line: index + 1,
            message: message.to_string(),
        };

        let (key, value) = line.split_once('=').ok_or_else(|| fail("expected KEY=VALUE"))?;
        let key = key.trim();
        if key.is_empty()
            || key.starts_with(|c: char| c.is_ascii_digit())
            || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(fail("invalid variable name"));
        }

        vars.insert(key.to_string(), unquote(value.trim()).map_err(|m| fail(m))?);
    }

    Ok(vars)
}

fn unquote(value: &str) -> Result<String, &'static str> {
    let Some(quote) = value.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        // Unquoted values may carry a trailing comment
        let value = match value.find(" #") {
            Some(pos) => &value[..pos],
            None => value,
        };
        return Ok(value.trim_end().to_string());
    };

    let inner = &value[1..];
    let end = inner.rfind(quote).ok_or("unterminated quoted value")?;
    let body = &inner[..end];
    if quote == '"' {
        Ok(body.replace("\\n", "\n").replace("\\\"", "\""))
    } else {
        Ok(body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> NopeusResult<BTreeMap<String, String>> {
        parse_env_file(content, Path::new(".env"))
    }

    #[test]
    fn parses_plain_pairs_and_comments() {
        let vars = parse("# comment\n\nA=1\nexport B = two\nC=three # note\n").unwrap();
        assert_eq!(vars["A"], "1");
        assert_eq!(vars["B"], "two");
        assert_eq!(vars["C"], "three");
    }

    #[test]
    fn parses_quoted_values() {
        let vars = parse("A=\"hello world\"\nB='a#b'\nC=\"line\\nbreak\"\nD=\"\"").unwrap();
        assert_eq!(vars["A"], "hello world");
        assert_eq!(vars["B"], "a#b");
        assert_eq!(vars["C"], "line\nbreak");
        assert_eq!(vars["D"], "");
    }

    #[test]
    fn value_may_contain_equals() {
        let vars = parse("URL=postgres://u:p@db/x?sslmode=require").unwrap();
        assert_eq!(vars["URL"], "postgres://u:p@db/x?sslmode=require");
    }

    #[test]
    fn later_entries_win() {
        let vars = parse("A=1\nA=2").unwrap();
        assert_eq!(vars["A"], "2");
    }

    #[test]
    fn reports_line_of_malformed_entry() {
        let err = parse("A=1\nnot a pair\n").unwrap_err();
        match err {
            NopeusError::EnvFile { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_invalid_names_and_open_quotes() {
        assert!(parse("1A=x").is_err());
        assert!(parse("A-B=x").is_err());
        assert!(parse("A=\"open").is_err());
    }
}
