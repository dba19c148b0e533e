// FICHIER : src-probe/src/schema/jsonc.rs

//! Dialecte JSON-avec-commentaires : `//`, `/* */` et virgules finales.
//! Les commentaires sont remplacés par des espaces (sauts de ligne conservés)
//! pour que les positions d'erreur de serde_json restent celles du source.

use crate::utils::{AppError, Result};

/// Retire commentaires et virgules finales. Le contenu des chaînes est intact.
pub fn to_plain_json(src: &str) -> Result<String> {
    let without_comments = strip_comments(src)?;
    Ok(strip_trailing_commas(&without_comments))
}

pub fn strip_comments(src: &str) -> Result<String> {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.char_indices().peekable();
    let mut in_string = false;
    let mut line = 1usize;

    while let Some((_, c)) = chars.next() {
        if c == '\n' {
            line += 1;
        }

        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some((_, escaped)) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                out.push_str("  ");
                chars.next();
                while let Some((_, n)) = chars.peek() {
                    if *n == '\n' {
                        break;
                    }
                    out.push(' ');
                    chars.next();
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                let opened_at = line;
                out.push_str("  ");
                chars.next();
                let mut closed = false;
                while let Some((_, n)) = chars.next() {
                    if n == '*' && matches!(chars.peek(), Some((_, '/'))) {
                        chars.next();
                        out.push_str("  ");
                        closed = true;
                        break;
                    }
                    if n == '\n' {
                        line += 1;
                        out.push('\n');
                    } else {
                        out.push(' ');
                    }
                }
                if !closed {
                    return Err(AppError::Parse(format!(
                        "Commentaire bloc non terminé (ouvert ligne {})",
                        opened_at
                    )));
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Remplace par un espace toute virgule qui suit une valeur et précède
/// (aux blancs près) `}` ou `]`. `{,}` et `[,]` restent invalides.
pub fn strip_trailing_commas(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut in_string = false;
    // Dernier caractère significatif émis hors blancs.
    let mut previous: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.get(i + 1) {
                    out.push(*escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            let after_value = !matches!(previous, None | Some('{') | Some('[') | Some(','));
            if after_value && matches!(next, Some('}') | Some(']')) {
                out.push(' ');
                i += 1;
                continue;
            }
            out.push(c);
        } else {
            out.push(c);
        }
        if !c.is_whitespace() {
            previous = Some(c);
        }
        i += 1;
    }

    out
}
