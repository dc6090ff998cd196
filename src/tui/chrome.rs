// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Layout, title, footer, help, and style helpers used by TUI rendering.
fn stack_main_panes_vertically(area: Rect, sidebar_panel_count: usize) -> bool {
    if sidebar_panel_count >= 2 {
        area.width < 110
    } else {
        area.width < 90
    }
}

fn footer_uses_compact_mode(area: Rect, sidebar_panel_count: usize) -> bool {
    area.width < 100 || stack_main_panes_vertically(area, sidebar_panel_count)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Board,
    Panel(OverlayCategory),
}

impl Focus {
    /// Next entry of `order` after `self`, wrapping; `Board` when `self` is not in `order`.
    fn cycle_in(self, order: &[Focus], step: isize) -> Self {
        let Some(pos) = order.iter().position(|focus| *focus == self) else {
            return Self::Board;
        };
        let len = order.len() as isize;
        let next = (pos as isize + step).rem_euclid(len);
        order[next as usize]
    }
}

fn panel_border_style_for_focus(active: Focus, panel: Focus) -> Style {
    if active != panel {
        return Style::default();
    }

    Style::default().fg(FOCUS_COLOR)
}

fn view_title(label: &str, key: char, tail: Option<&str>) -> String {
    let mut title = format!("─[{key}]─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn board_view_title(
    is_focused: bool,
    anchors: usize,
    connectors_visible: usize,
    connectors_total: usize,
) -> Line<'static> {
    let label_color = if is_focused {
        Color::White
    } else {
        Color::Gray
    };
    Line::from(vec![
        Span::styled("─ Pipeline ".to_owned(), Style::default().fg(label_color)),
        Span::styled(
            format!("[{anchors} stages · {connectors_visible}/{connectors_total} links]"),
            Style::default().fg(Color::LightGreen),
        ),
        Span::raw(" ".to_owned()),
    ])
}

fn panel_title(category: OverlayCategory, source: Option<&Path>) -> String {
    let tail = source
        .and_then(|path| path.file_name())
        .map(|name| format!("— {}", name.to_string_lossy()));
    view_title(category.title(), category.toggle_key(), tail.as_deref())
}

fn panel_text(payload: Option<&serde_json::Value>, last_error: Option<&str>) -> Text<'static> {
    let mut lines = Vec::<Line<'static>>::new();
    if let Some(err) = last_error {
        lines.push(Line::from(Span::styled(
            format!("⚠ {err}"),
            Style::default().fg(ERROR_COLOR),
        )));
    }
    let body_style = if payload.is_some() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    lines.extend(
        panel_lines(payload)
            .into_iter()
            .map(|line| Line::from(Span::styled(line, body_style))),
    );
    Text::from(lines)
}

/// Hard-wraps every line of `text` at `width` columns so one row on screen is one line here.
fn wrap_panel_text(text: Text<'static>, width: usize) -> Text<'static> {
    let width = width.max(1);
    let mut rows = Vec::<Line<'static>>::with_capacity(text.lines.len());
    for line in text.lines {
        let style = line.spans.first().map(|span| span.style).unwrap_or_default();
        let content = line.spans.iter().map(|span| span.content.as_ref()).collect::<String>();
        let chars = content.chars().collect::<Vec<_>>();
        if chars.is_empty() {
            rows.push(Line::from(Span::styled(String::new(), style)));
            continue;
        }
        for chunk in chars.chunks(width) {
            rows.push(Line::from(Span::styled(chunk.iter().collect::<String>(), style)));
        }
    }
    Text::from(rows)
}

fn style_for_board_cell(ch: char, paint: Option<&AnchorPaint>) -> Style {
    if let Some(paint) = paint {
        return Style::default()
            .fg(rgb_color(paint.text_color))
            .bg(rgb_color(paint.background_color));
    }
    if ArrowDirection::is_arrow_glyph(ch) {
        return Style::default().fg(ARROW_COLOR).add_modifier(Modifier::BOLD);
    }
    if ch == ' ' {
        Style::default()
    } else {
        Style::default().fg(CONNECTOR_COLOR)
    }
}

fn rgb_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

fn footer_help_line(app: &App, toast_suffix: &str, compact: bool) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let frontend = OverlayCategory::FrontendSummary;
    let mvo = OverlayCategory::OptimizerSummary;

    if compact {
        push_footer_entry(&mut spans, "Load", "f/m");
        push_footer_entry(&mut spans, "Panels", "1/2");
        push_footer_entry(&mut spans, "Help", "?");
        push_footer_entry(&mut spans, "Quit", "q");
    } else {
        match app.focus {
            Focus::Board => push_footer_entry(&mut spans, "Pan", "←↓↑→"),
            Focus::Panel(_) => {
                push_footer_entry(&mut spans, "Scroll", "↓↑");
                push_footer_entry(&mut spans, "Hide", "x");
            }
        }
        push_footer_entry(&mut spans, frontend.title(), &frontend.pick_key().to_string());
        push_footer_entry(&mut spans, mvo.title(), &mvo.pick_key().to_string());
        push_footer_entry(&mut spans, "Panels", "1/2");
        push_footer_entry(&mut spans, "Focus", "Tab");
        push_footer_entry(&mut spans, "Help", "?");
        push_footer_entry(&mut spans, "Quit", "q");
    }

    let toast_message = toast_suffix.strip_prefix(" | ").unwrap_or(toast_suffix);
    if !toast_message.is_empty() {
        spans.push(Span::styled(" | ".to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)));
        spans.push(Span::styled(
            "Toast:".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
        spans.push(Span::raw(toast_message.to_owned()));
    }

    Line::from(spans)
}

fn prompt_footer_line(prompt: &PathPrompt) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("Load {} from: ", prompt.category.title()),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ),
        Span::styled(prompt.input.clone(), Style::default().fg(Color::White)),
    ])
}

fn prompt_prefix_width(prompt: &PathPrompt) -> usize {
    format!("Load {} from: ", prompt.category.title()).chars().count()
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default().fg(FOOTER_BRAND_COLOR),
    )])
}

fn help_key_style() -> Style {
    Style::default()
        .fg(FOOTER_KEY_COLOR)
        .add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn help_lines() -> Vec<Line<'static>> {
    let key_style = help_key_style();
    let header_style = help_header_style();
    let key_col_width = ["Tab/Shift-Tab", "←↓↑→ / hjkl"]
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();
    lines.push(Line::from(Span::styled("--- Global ---", header_style)));
    lines.push(help_kv("?", "Help (toggle)", key_col_width, key_style));
    lines.push(help_kv("q", "Quit", key_col_width, key_style));
    lines.push(help_kv("Tab/Shift-Tab", "Focus next/previous panel", key_col_width, key_style));
    lines.push(Line::raw(""));

    lines.push(Line::from(Span::styled("--- Overlays ---", header_style)));
    for category in OverlayCategory::ALL {
        lines.push(help_kv(
            &category.pick_key().to_string(),
            &format!("Load {} from a JSON file", category.title()),
            key_col_width,
            key_style,
        ));
    }
    for category in OverlayCategory::ALL {
        lines.push(help_kv(
            &category.toggle_key().to_string(),
            &format!("Show/hide {} panel", category.title()),
            key_col_width,
            key_style,
        ));
    }
    lines.push(help_kv("x", "Hide focused panel (data is kept)", key_col_width, key_style));
    lines.push(Line::raw(""));

    lines.push(Line::from(Span::styled("--- Board ---", header_style)));
    lines.push(help_kv("←↓↑→ / hjkl", "Pan board / scroll panel", key_col_width, key_style));
    lines.push(help_kv("Home", "Reset pan / scroll", key_col_width, key_style));
    lines.push(Line::raw(""));

    lines.push(Line::from(Span::styled("--- File prompt ---", header_style)));
    lines.push(help_kv("Enter", "Load file", key_col_width, key_style));
    lines.push(help_kv("Esc", "Cancel", key_col_width, key_style));
    lines
}

fn render_help(frame: &mut Frame<'_>, main_area: Rect) {
    let area = centered_rect(70, 70, main_area);
    frame.render_widget(Clear, area);

    let paragraph = Paragraph::new(Text::from(help_lines()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(FOCUS_COLOR)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(
            " | ".to_owned(),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    spans.push(Span::styled(
        format!("{label}:"),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::styled(
        value.to_owned(),
        Style::default()
            .fg(FOOTER_KEY_COLOR)
            .add_modifier(Modifier::BOLD),
    ));
}
