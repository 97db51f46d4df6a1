/*
 * Copyright © 2024 Volodymyr Kadzhaia
 * Copyright © 2024 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use nom::error::Error as NomError;
use nom::Offset;

/// Renders a nom failure as `line L, column C` with the offending line and a
/// caret. The parser only saw `section`, a slice of `document`; positions are
/// reported against the whole document.
pub fn format_section_error(document: &str, section: &str, err: nom::Err<NomError<&str>>) -> String {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let first_line = document[..document.offset(section)].matches('\n').count() + 1;
            if let Some(error_msg) = scan_for_specific_errors(section, first_line) {
                return error_msg;
            }
            let error_description = match e.code {
                nom::error::ErrorKind::Tag => ". Expected a specific tag or token",
                nom::error::ErrorKind::Char => ". Expected a specific character",
                nom::error::ErrorKind::Alt => ". Expected one of several alternatives",
                nom::error::ErrorKind::Eof => ". Unexpected trailing input",
                nom::error::ErrorKind::Verify => ". Action literals may only appear in a rule head",
                _ => "",
            };
            format_at_offset(document, document.offset(e.input), error_description)
        }
        nom::Err::Incomplete(_) => {
            "Incomplete input: the parser needs more input to complete parsing".to_string()
        }
    }
}

pub fn format_at_offset(input: &str, offset: usize, description: &str) -> String {
    let mut line_no = 1;
    let mut col_no = 1;

    for (i, c) in input.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_no += 1;
            col_no = 1;
        } else {
            col_no += 1;
        }
    }

    let lines: Vec<&str> = input.lines().collect();
    let error_line = if line_no <= lines.len() {
        lines[line_no - 1]
    } else {
        "[end of input]"
    };

    format!(
        "line {}, column {}{}:\n{}\n{}^ Here",
        line_no,
        col_no,
        description,
        error_line,
        " ".repeat(col_no - 1)
    )
}

fn scan_for_specific_errors(input: &str, first_line: usize) -> Option<String> {
    let lines: Vec<&str> = input.lines().collect();

    if let Some(error_msg) = check_for_mismatched_parentheses(&lines, first_line) {
        return Some(error_msg);
    }
    check_for_missing_implies(input, first_line)
}

fn check_for_mismatched_parentheses(lines: &[&str], first_line: usize) -> Option<String> {
    let mut depth: i64 = 0;
    for (i, line) in lines.iter().enumerate() {
        for c in line.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return Some(format!("line {}: unmatched ')'", i + first_line));
            }
        }
    }
    if depth > 0 {
        return Some("unclosed '(' at end of input".to_string());
    }
    None
}

// A rule statement (has `::`) must also have `implies` before its `;`. The
// statement may span lines and use any whitespace around the keyword.
fn check_for_missing_implies(input: &str, first_line: usize) -> Option<String> {
    let mut line = first_line;
    for statement in input.split_inclusive(';') {
        let complete = statement.ends_with(';');
        let leading = &statement[..statement.len() - statement.trim_start().len()];
        let start_line = line + leading.matches('\n').count();
        line += statement.matches('\n').count();

        let has_implies = statement
            .split(|c: char| c.is_whitespace() || c == ',' || c == ')')
            .any(|word| word == "implies");
        if complete && statement.contains("::") && !has_implies {
            return Some(format!("line {}: rule is missing `implies`", start_line));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_points_at_line_and_column() {
        let input = "r0 :: a(X) implies b(X);\nr1 :: c(X) impli d(X);";
        let message = format_at_offset(input, 36, "");
        assert!(message.starts_with("line 2, column 12"));
        assert!(message.contains("r1 :: c(X) impli d(X);"));
    }

    #[test]
    fn test_specific_checks() {
        assert_eq!(
            check_for_mismatched_parentheses(&["a(b;"], 1),
            Some("unclosed '(' at end of input".to_string())
        );
        assert_eq!(
            check_for_missing_implies("r0 :: a(X), b(X);", 3),
            Some("line 3: rule is missing `implies`".to_string())
        );
        assert_eq!(
            check_for_missing_implies("r0 :: a(X) implies b(X);\nr1 :: c(X), d(X);", 1),
            Some("line 2: rule is missing `implies`".to_string())
        );
    }

    #[test]
    fn test_implies_may_sit_after_any_whitespace() {
        assert_eq!(check_for_missing_implies("r0 :: a(X)\timplies b(X);", 1), None);
        assert_eq!(check_for_missing_implies("r0 :: a(X),\n  c(X)\nimplies\tb(X);", 1), None);
    }
}
