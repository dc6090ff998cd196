// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::Canvas;

/// Canvas rows with trailing blanks removed and trailing empty rows dropped.
pub(crate) fn canvas_to_string_trimmed(canvas: &Canvas) -> String {
    let mut lines = canvas
        .rows()
        .into_iter()
        .map(|row| row.trim_end_matches(' ').to_owned())
        .collect::<Vec<_>>();

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::canvas_to_string_trimmed;
    use crate::render::Canvas;

    #[test]
    fn trims_trailing_spaces_and_blank_rows() {
        let mut c = Canvas::new(5, 4).unwrap();
        c.write_str(0, 0, "ab").unwrap();
        c.write_str(1, 1, "c").unwrap();
        assert_eq!(canvas_to_string_trimmed(&c), "ab\n c");
    }

    #[test]
    fn blank_canvas_is_empty() {
        let c = Canvas::new(3, 3).unwrap();
        assert_eq!(canvas_to_string_trimmed(&c), "");
    }
}
