//! `.properties` files.
//!
//! The line-oriented `key=value` format: `#`/`!` comments, `=`/`:`/whitespace
//! separators, backslash line continuations and escapes. Output is pure
//! ASCII, with everything else written as `\uXXXX`.

use crate::config::CommonsConfig;
use crate::resource::ResourceDirs;
use crate::util::fs::{create_dir, get_relative};
use commons_types::{CommonsError, Properties, ResourceLoader, Result};
use encoding_rs::Encoding;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Parse `.properties` text.
///
/// Later duplicates of a key replace earlier ones.
pub fn parse_props(text: &str) -> Result<Properties> {
    let mut props = Properties::new();
    let normalized = text.replace("\r\n", "\n");
    let mut logical = String::new();
    let mut continuing = false;

    for line in normalized.split(|c| c == '\n' || c == '\r') {
        let trimmed = line.trim_start_matches(is_blank);
        if !continuing && (trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!')) {
            continue;
        }

        let trailing = trimmed.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            logical.push_str(&trimmed[..trimmed.len() - 1]);
            continuing = true;
            continue;
        }

        logical.push_str(trimmed);
        continuing = false;
        if !logical.is_empty() {
            let (key, value) = split_entry(&logical)?;
            props.insert(key, value);
        }
        logical.clear();
    }

    // Continuation marker on the last line
    if !logical.is_empty() {
        let (key, value) = split_entry(&logical)?;
        props.insert(key, value);
    }

    Ok(props)
}

fn split_entry(line: &str) -> Result<(String, String)> {
    let chars: Vec<char> = line.chars().collect();
    let mut key_len = 0;
    let mut value_start = chars.len();
    let mut has_separator = false;
    let mut escaped = false;

    while key_len < chars.len() {
        let c = chars[key_len];
        if !escaped && (c == '=' || c == ':') {
            value_start = key_len + 1;
            has_separator = true;
            break;
        }
        if !escaped && is_blank(c) {
            value_start = key_len + 1;
            break;
        }
        escaped = c == '\\' && !escaped;
        key_len += 1;
    }

    while value_start < chars.len() {
        let c = chars[value_start];
        if !is_blank(c) {
            if !has_separator && (c == '=' || c == ':') {
                has_separator = true;
            } else {
                break;
            }
        }
        value_start += 1;
    }

    Ok((unescape(&chars[..key_len])?, unescape(&chars[value_start..])?))
}

fn unescape(chars: &[char]) -> Result<String> {
    let mut units: Vec<u16> = Vec::with_capacity(chars.len());
    let mut buf = [0u16; 2];
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            units.extend_from_slice(c.encode_utf16(&mut buf));
            continue;
        }
        let Some(&next) = chars.get(i) else {
            break;
        };
        i += 1;
        let decoded = match next {
            'u' => {
                let hex: String = chars.iter().skip(i).take(4).collect();
                if hex.len() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    return Err(CommonsError::Runtime("Malformed \\uxxxx encoding".to_string()));
                }
                i += 4;
                let unit = u16::from_str_radix(&hex, 16)
                    .map_err(|e| CommonsError::runtime("Malformed \\uxxxx encoding", e))?;
                units.push(unit);
                continue;
            }
            't' => '\t',
            'r' => '\r',
            'n' => '\n',
            'f' => '\x0c',
            other => other,
        };
        units.extend_from_slice(decoded.encode_utf16(&mut buf));
    }

    String::from_utf16(&units).map_err(|e| CommonsError::runtime("Malformed \\uxxxx encoding", e))
}

fn escape(text: &str, escape_space: bool, out: &mut String) {
    let mut buf = [0u16; 2];
    for (index, c) in text.chars().enumerate() {
        match c {
            ' ' if index == 0 || escape_space => out.push_str("\\ "),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c if !(' '..='~').contains(&c) => {
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
            c => out.push(c),
        }
    }
}

/// Render properties as `.properties` text.
///
/// Optional `comments` come first, one `#` line each, followed by a
/// timestamp line and the entries in map order.
pub fn format_props(props: &Properties, comments: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(comments) = comments {
        for line in comments.lines() {
            out.push('#');
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push('#');
    out.push_str(&chrono::Local::now().format("%a %b %d %H:%M:%S %Z %Y").to_string());
    out.push('\n');

    for (key, value) in props {
        escape(key, true, &mut out);
        out.push('=');
        escape(value, false, &mut out);
        out.push('\n');
    }
    out
}

fn store(props: &Properties, file: &Path) -> Result<()> {
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent)?;
    }
    let mut writer = BufWriter::new(File::create(file)?);
    writer.write_all(format_props(props, None).as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn decode(bytes: &[u8], charset: &str) -> Result<Properties> {
    let encoding = Encoding::for_label(charset.trim().as_bytes())
        .ok_or_else(|| CommonsError::Runtime(format!("Unsupported charset {}", charset)))?;
    let (text, _, _) = encoding.decode(bytes);
    parse_props(&text)
}

fn load(file: &Path, charset: &str) -> Result<Properties> {
    decode(&fs::read(file)?, charset)
}

/// Write properties to `file`, creating parent directories.
///
/// Returns the file path.
pub fn write_props(props: &Properties, file: impl AsRef<Path>) -> Result<PathBuf> {
    let file = file.as_ref();
    let msg = format!("Write Properties to {}", get_relative(file).display());

    if let Err(e) = store(props, file) {
        tracing::error!("{}", msg);
        return Err(CommonsError::runtime(msg, e));
    }
    tracing::debug!("{}", msg);
    Ok(file.to_path_buf())
}

/// Read properties from `file`, decoding it with `charset`.
///
/// `charset` is any WHATWG encoding label (`UTF-8`, `ISO-8859-1`,
/// `Shift_JIS`, ...).
pub fn read_props(file: impl AsRef<Path>, charset: &str) -> Result<Properties> {
    let file = file.as_ref();
    let msg = format!("Read Properties from {}", get_relative(file).display());

    match load(file, charset) {
        Ok(props) => {
            tracing::debug!("{}", msg);
            Ok(props)
        }
        Err(e) => {
            tracing::error!("{}", msg);
            Err(CommonsError::runtime(msg, e))
        }
    }
}

/// Read a properties resource from the configured resource roots.
pub fn read_props_resource(name: &str) -> Result<Properties> {
    read_props_resource_with(&ResourceDirs::new(), name)
}

/// Read a properties resource through `loader`, decoded with the
/// configured charset (`UTF-8` unless set).
pub fn read_props_resource_with(loader: &impl ResourceLoader, name: &str) -> Result<Properties> {
    read_props_resource_in(loader, name, &CommonsConfig::global().charset)
}

/// Read a properties resource through `loader`, decoded with `charset`.
pub fn read_props_resource_in(
    loader: &impl ResourceLoader,
    name: &str,
    charset: &str,
) -> Result<Properties> {
    let bytes = loader.read(name)?;
    tracing::debug!(resource = name, charset, "Read Properties from resource");
    decode(&bytes, charset)
}
