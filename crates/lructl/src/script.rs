//! Line-oriented command language for driving a cache

use std::fmt;

use lrucache::SharedCache;

/// One parsed script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Put { key: String, value: String },
    Get(String),
    Del(String),
    Has(String),
    Len,
    Dump,
    Stats,
    Clear,
}

/// Why a script line was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnknownCommand(String),
    WrongArity(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownCommand(cmd) => write!(f, "unknown command '{}'", cmd),
            ParseError::WrongArity(cmd) => {
                write!(f, "wrong number of arguments for '{}' command", cmd)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl Command {
    /// Parse a script line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let cmd = match verb.to_uppercase().as_str() {
            "PUT" => {
                // Value is the remainder of the line, inner spacing preserved.
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(ParseError::WrongArity("put"))?;
                Command::Put {
                    key: key.to_string(),
                    value: value.trim_start().to_string(),
                }
            }
            "GET" => Command::Get(single(&args, "get")?),
            "DEL" => Command::Del(single(&args, "del")?),
            "HAS" => Command::Has(single(&args, "has")?),
            "LEN" => nullary(&args, "len", Command::Len)?,
            "DUMP" => nullary(&args, "dump", Command::Dump)?,
            "STATS" => nullary(&args, "stats", Command::Stats)?,
            "CLEAR" => nullary(&args, "clear", Command::Clear)?,
            _ => return Err(ParseError::UnknownCommand(verb.to_string())),
        };

        Ok(Some(cmd))
    }
}

fn single(args: &[&str], name: &'static str) -> Result<String, ParseError> {
    match args {
        [key] => Ok((*key).to_string()),
        _ => Err(ParseError::WrongArity(name)),
    }
}

fn nullary(args: &[&str], name: &'static str, cmd: Command) -> Result<Command, ParseError> {
    if args.is_empty() {
        Ok(cmd)
    } else {
        Err(ParseError::WrongArity(name))
    }
}

/// Executes commands against one cache
pub struct Session {
    cache: SharedCache<String, String>,
}

impl Session {
    pub fn new(cache: SharedCache<String, String>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &SharedCache<String, String> {
        &self.cache
    }

    /// Run one script line and return its output line, if any
    pub fn run_line(&self, line: &str) -> Option<String> {
        match Command::parse(line) {
            Ok(Some(cmd)) => Some(self.execute(cmd)),
            Ok(None) => None,
            Err(e) => Some(format!("ERR {}", e)),
        }
    }

    pub fn execute(&self, cmd: Command) -> String {
        match cmd {
            Command::Put { key, value } => {
                self.cache.put(key, value);
                "OK".to_string()
            }
            Command::Get(key) => self
                .cache
                .get(key.as_str())
                .unwrap_or_else(|| "(nil)".to_string()),
            Command::Del(key) => flag(self.cache.remove(key.as_str()).is_some()),
            Command::Has(key) => flag(self.cache.contains(key.as_str())),
            Command::Len => self.cache.len().to_string(),
            Command::Dump => {
                let keys = self.cache.keys();
                if keys.is_empty() {
                    "(empty)".to_string()
                } else {
                    keys.join(" ")
                }
            }
            Command::Stats => {
                let s = self.cache.stats().snapshot();
                format!(
                    "hits={} misses={} inserts={} updates={} evictions={} hit_ratio={:.2}",
                    s.hits, s.misses, s.inserts, s.updates, s.evictions, s.hit_ratio
                )
            }
            Command::Clear => {
                self.cache.clear();
                "OK".to_string()
            }
        }
    }
}

fn flag(b: bool) -> String {
    let s = if b { "1" } else { "0" };
    s.to_string()
}
