//! UI rendering module

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Gauge, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
};

use crate::app::{App, DownloadField, Tab, TransferKind, TransferStatus};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_main(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    // 模态提示框最后画，盖在所有内容上面
    if let Some(message) = &app.alert {
        draw_alert(frame, message);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let titles = vec!["Share", "Download", "Transfers", "Log"];
    let selected = match app.tab {
        Tab::Share => 0,
        Tab::Download => 1,
        Tab::Transfers => 2,
        Tab::Log => 3,
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Peerdrop "))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow).bold());

    frame.render_widget(tabs, area);
}

fn draw_main(frame: &mut Frame, app: &App, area: Rect) {
    match app.tab {
        Tab::Share => draw_share_tab(frame, app, area),
        Tab::Download => draw_download_tab(frame, app, area),
        Tab::Transfers => draw_transfers_tab(frame, app, area),
        Tab::Log => draw_log_tab(frame, app, area),
    }
}

fn draw_share_tab(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // File input
            Constraint::Length(4), // Share result
            Constraint::Min(3),    // Help
        ])
        .split(area);

    let input = Paragraph::new(app.share_file_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" 📄 File to share ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(input, chunks[0]);

    // 共享结果面板，成功后才显示
    if let Some(file_id) = &app.share_result {
        let result = Paragraph::new(vec![
            Line::from("File shared successfully!"),
            Line::from(vec![
                Span::raw("File ID: "),
                Span::styled(file_id.clone(), Style::default().fg(Color::Green).bold()),
            ]),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Result "));
        frame.render_widget(result, chunks[1]);
    }

    let help = Paragraph::new(
        "Type the path of the file to share\nEnter to submit\nTab to switch tabs, Esc to quit",
    )
    .block(Block::default().borders(Borders::ALL).title(" Help "))
    .wrap(Wrap { trim: true });
    frame.render_widget(help, chunks[2]);
}

fn draw_download_tab(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // File ID input
            Constraint::Length(3), // Output path input
            Constraint::Length(3), // Progress panel
            Constraint::Min(3),    // Help
        ])
        .split(area);

    let field_style = |field| {
        if app.download_field == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    let file_id = Paragraph::new(app.file_id_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" 🔢 File ID ")
            .border_style(field_style(DownloadField::FileId)),
    );
    frame.render_widget(file_id, chunks[0]);

    let output_path = Paragraph::new(app.output_path_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" 📁 Output path ")
            .border_style(field_style(DownloadField::OutputPath)),
    );
    frame.render_widget(output_path, chunks[1]);

    // 下载进度面板：下载开始后显示，完成 2s 后隐藏
    if let Some(percent) = app.panel_progress {
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" 📦 Download progress "),
            )
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .percent(u16::from(percent))
            .label(format!("{}%", percent));
        frame.render_widget(gauge, chunks[2]);
    }

    let help = Paragraph::new(
        "Up/Down to switch fields, Enter to submit\nTab to switch tabs, Esc to quit",
    )
    .block(Block::default().borders(Borders::ALL).title(" Help "))
    .wrap(Wrap { trim: true });
    frame.render_widget(help, chunks[3]);
}

fn draw_transfers_tab(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(["File", "Type", "Progress", "Status"])
        .style(Style::default().fg(Color::Gray).bold())
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .transfers
        .iter()
        .map(|t| {
            // 两种类型各自的颜色徽章，对应页面版蓝/绿两套样式
            let kind_color = match t.kind {
                TransferKind::Share => Color::Blue,
                TransferKind::Download => Color::Green,
            };
            let status_style = match t.status {
                TransferStatus::Completed => Style::default().fg(Color::Green),
                TransferStatus::InProgress => Style::default().fg(Color::Yellow),
            };
            Row::new(vec![
                Cell::from(t.label.clone()),
                Cell::from(t.kind.label()).style(Style::default().fg(kind_color).bold()),
                Cell::from(format!("{} {:3}%", progress_bar(t.progress), t.progress)),
                Cell::from(t.status.label()).style(status_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" 🔄 Recent transfers "),
    );

    frame.render_widget(table, area);
}

fn draw_log_tab(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .logs
        .iter()
        .filter(|entry| entry.level <= app.log_level)
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| ListItem::new(format!("{} {}", entry.level.icon(), entry.message)))
        .collect();

    let title = format!(" 📋 Log ({}) ", app.log_level);
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(list, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Paragraph::new(format!(
        " {} │ transfers: {} │ [Tab]switch [Enter]submit [d]ebug [c]lear [Esc]quit",
        app.status_message,
        app.transfers.len()
    ))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(status, area);
}

fn draw_alert(frame: &mut Frame, message: &str) {
    let area = centered_rect(60, frame.area());

    frame.render_widget(Clear, area);
    let popup = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "press any key",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" ⚠️  Alert ")
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(popup, area);
}

/// 居中的弹窗区域
fn centered_rect(percent_x: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Min(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// 行内的十格进度条
fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent / 10).min(10);
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}
