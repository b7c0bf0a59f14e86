use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    BarChart, Block, Cell, Clear, List, ListItem, Paragraph, Row, Sparkline, Table, Tabs, Wrap,
};
use ratatui::Frame;

use super::input::LineEdit;
use super::state::{App, Tab};
use super::util::fmt_money;

const TAB_TITLES: [&str; 6] = [
    "1 Overview",
    "2 Expenses",
    "3 Budgets",
    "4 Income",
    "5 Savings",
    "6 Insights",
];

pub fn draw(f: &mut Frame, app: &mut App) {
    if app.tab == Tab::Login {
        draw_login(f, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_tab_bar(f, app, chunks[0]);
    match app.tab {
        Tab::Overview => draw_overview(f, app, chunks[1]),
        Tab::Expenses => draw_expenses(f, app, chunks[1]),
        Tab::Budgets => draw_budgets(f, app, chunks[1]),
        Tab::Income => draw_income(f, app, chunks[1]),
        Tab::Savings => draw_savings(f, app, chunks[1]),
        Tab::Insights => draw_insights(f, app, chunks[1]),
        Tab::Help => draw_help(f, chunks[1]),
        Tab::Login => unreachable!(),
    }
    draw_status_bar(f, app, chunks[2]);
}

fn draw_tab_bar(f: &mut Frame, app: &App, area: Rect) {
    let selected = match app.tab {
        Tab::Overview => 0,
        Tab::Expenses => 1,
        Tab::Budgets => 2,
        Tab::Income => 3,
        Tab::Savings => 4,
        Tab::Insights => 5,
        _ => 0,
    };
    let user = app
        .session
        .as_ref()
        .map(|s| s.user_name.as_str())
        .unwrap_or("");
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(user.len() as u16 + 2)])
        .split(area);

    let tabs = Tabs::new(TAB_TITLES.to_vec())
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, cols[0]);
    f.render_widget(
        Paragraph::new(user).alignment(Alignment::Right),
        cols[1],
    );
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status {
        Some(status) => {
            let color = if status.is_error {
                Color::Red
            } else {
                Color::Green
            };
            Line::from(Span::styled(
                status.text.clone(),
                Style::default().fg(color),
            ))
        }
        None => Line::from(Span::styled(
            "q quit | r refresh | l logout | tab switch | a add | e edit | x delete | ? help",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

// ============= overview =============

fn draw_overview(f: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let rows: Vec<Row> = app
        .data
        .remaining
        .iter()
        .map(|r| {
            let style = if r.remaining < 0.0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(r.category.clone()),
                Cell::from(fmt_money(r.budget)),
                Cell::from(fmt_money(r.spent)),
                Cell::from(fmt_money(r.remaining)),
                Cell::from(format!("{:.0}%", r.used_percent)),
            ])
            .style(style)
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(6),
        ],
    )
    .header(header_row(&["Category", "Budget", "Spent", "Left", "Used"]))
    .block(Block::bordered().title(format!("Budget remaining ({})", app.data.month)));
    f.render_widget(table, cols[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(cols[1]);

    let trend: Vec<u64> = app
        .data
        .monthly_trend
        .iter()
        .map(|t| t.total.round().max(0.0) as u64)
        .collect();
    let spark = Sparkline::default()
        .data(&trend)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::bordered().title("Spending trend by month"));
    f.render_widget(spark, right[0]);

    let rows: Vec<Row> = app
        .data
        .budget_vs_savings
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.month.clone()),
                Cell::from(fmt_money(p.budget_total)),
                Cell::from(fmt_money(p.savings_saved)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header_row(&["Month", "Budget", "Saved"]))
    .block(Block::bordered().title("Budget vs savings"));
    f.render_widget(table, right[1]);
}

// ============= expenses =============

fn draw_expenses(f: &mut Frame, app: &mut App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let rows: Vec<Row> = app
        .data
        .expenses
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(e.date.clone()),
                Cell::from(e.category.clone()),
                Cell::from(fmt_money(e.amount)),
                Cell::from(e.description.clone()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(header_row(&["Date", "Category", "Amount", "Description"]))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .block(Block::bordered().title("Expenses"));
    f.render_stateful_widget(table, cols[0], &mut app.expenses.table);

    let bars: Vec<(String, u64)> = app
        .data
        .category_totals
        .iter()
        .map(|c| (c.category.clone(), c.total.round().max(0.0) as u64))
        .collect();
    let data: Vec<(&str, u64)> = bars.iter().map(|(c, v)| (c.as_str(), *v)).collect();
    let chart = BarChart::default()
        .data(&data)
        .bar_width(9)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .block(Block::bordered().title(format!("By category ({})", app.data.month)));
    f.render_widget(chart, cols[1]);

    if app.expenses.form_open {
        let form = &app.expenses.form;
        let title = if form.editing.is_some() {
            "Edit expense"
        } else {
            "Add expense"
        };
        draw_form(
            f,
            title,
            &[
                ("Amount", &form.amount),
                ("Category", &form.category),
                ("Date", &form.date),
                ("Description", &form.description),
            ],
            form.focus,
            form.error.as_deref(),
        );
    }
}

// ============= budgets =============

fn draw_budgets(f: &mut Frame, app: &mut App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let threshold = app.high_budget_threshold;
    let rows: Vec<Row> = app
        .data
        .budgets
        .iter()
        .map(|b| {
            let style = if b.amount > threshold {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(b.category.clone()),
                Cell::from(fmt_money(b.amount)),
                Cell::from(b.month.clone()),
            ])
            .style(style)
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(12),
            Constraint::Length(9),
        ],
    )
    .header(header_row(&["Category", "Amount", "Month"]))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .block(Block::bordered().title("Budgets"));
    f.render_stateful_widget(table, cols[0], &mut app.budgets.table);

    let rows: Vec<Row> = app
        .data
        .allocation
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(s.label.clone()),
                Cell::from(fmt_money(s.amount)),
                Cell::from(format!("{:.1}%", s.percent)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(12),
            Constraint::Length(7),
        ],
    )
    .header(header_row(&["Category", "Amount", "Share"]))
    .block(Block::bordered().title(format!("Allocation ({})", app.data.month)));
    f.render_widget(table, cols[1]);

    if app.budgets.form_open {
        let form = &app.budgets.form;
        draw_form(
            f,
            "Set budget",
            &[
                ("Category", &form.category),
                ("Amount", &form.amount),
                ("Month", &form.month),
            ],
            form.focus,
            form.error.as_deref(),
        );
    }
}

// ============= income =============

fn draw_income(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .data
        .income
        .iter()
        .map(|i| {
            Row::new(vec![
                Cell::from(i.month.clone()),
                Cell::from(fmt_money(i.amount)),
            ])
        })
        .collect();
    let total: f64 = app.data.income.iter().map(|i| i.amount).sum();
    let table = Table::new(rows, [Constraint::Length(9), Constraint::Length(12)])
        .header(header_row(&["Month", "Amount"]))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::bordered().title(format!("Income (total {})", fmt_money(total))));
    f.render_stateful_widget(table, area, &mut app.income.table);

    if app.income.form_open {
        let form = &app.income.form;
        draw_form(
            f,
            "Record income",
            &[("Amount", &form.amount), ("Month", &form.month)],
            form.focus,
            form.error.as_deref(),
        );
    }
}

// ============= savings =============

fn draw_savings(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .data
        .savings
        .iter()
        .map(|s| {
            let progress = if s.goal > 0.0 {
                (s.saved / s.goal * 100.0).min(999.0)
            } else {
                0.0
            };
            Row::new(vec![
                Cell::from(s.month.clone()),
                Cell::from(fmt_money(s.goal)),
                Cell::from(fmt_money(s.saved)),
                Cell::from(format!("{progress:.0}%")),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(9),
        ],
    )
    .header(header_row(&["Month", "Goal", "Saved", "Progress"]))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .block(Block::bordered().title("Savings goals"));
    f.render_stateful_widget(table, area, &mut app.savings.table);

    if app.savings.form_open {
        let form = &app.savings.form;
        draw_form(
            f,
            "Record savings",
            &[
                ("Goal", &form.goal),
                ("Saved", &form.saved),
                ("Month", &form.month),
            ],
            form.focus,
            form.error.as_deref(),
        );
    }
}

// ============= insights =============

fn draw_insights(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(area);

    let prediction = match app.data.prediction {
        Some(p) => format!("Predicted spend next month: {}", fmt_money(p)),
        None => "Predicted spend next month: (no data yet)".to_owned(),
    };
    f.render_widget(
        Paragraph::new(prediction).block(Block::bordered().title("Prediction")),
        rows[0],
    );

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    let tips: Vec<ListItem> = app
        .data
        .tips
        .iter()
        .map(|t| ListItem::new(format!("- {t}")))
        .collect();
    f.render_widget(
        List::new(tips).block(Block::bordered().title("Recommendations")),
        cols[0],
    );

    let plan: Vec<Row> = app
        .data
        .auto_budget
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(s.label.clone()),
                Cell::from(fmt_money(s.amount)),
                Cell::from(format!("{:.1}%", s.percent)),
            ])
        })
        .collect();
    let table = Table::new(
        plan,
        [
            Constraint::Min(12),
            Constraint::Length(12),
            Constraint::Length(7),
        ],
    )
    .header(header_row(&["Category", "Amount", "Share"]))
    .block(Block::bordered().title("Suggested budget"));
    f.render_widget(table, cols[1]);

    let challenge = app
        .data
        .challenge
        .as_deref()
        .unwrap_or("(no challenge yet)");
    f.render_widget(
        Paragraph::new(challenge)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title("Savings challenge")),
        rows[2],
    );
}

// ============= help =============

fn draw_help(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from("Keys"),
        Line::from(""),
        Line::from("  1-6, Tab/Shift-Tab   switch view"),
        Line::from("  Up/Down              select row"),
        Line::from("  a                    add entry"),
        Line::from("  e                    edit expense"),
        Line::from("  x / Del              delete selected entry"),
        Line::from("  r                    refresh data"),
        Line::from("  l                    log out"),
        Line::from("  q                    quit"),
        Line::from(""),
        Line::from("In a form: Tab cycles fields, Enter submits, Esc cancels."),
        Line::from(""),
        Line::from("Press Esc to return."),
    ];
    f.render_widget(
        Paragraph::new(text).block(Block::bordered().title("Help")),
        area,
    );
}

// ============= login =============

fn draw_login(f: &mut Frame, app: &App) {
    let form = &app.login;
    let title = if form.signup_mode {
        "Sign up (Ctrl-T: log in)"
    } else {
        "Log in (Ctrl-T: sign up)"
    };
    let fields: Vec<(&str, &LineEdit)> = if form.signup_mode {
        vec![
            ("Name", &form.name),
            ("Email", &form.email),
            ("Password", &form.password),
        ]
    } else {
        vec![("Email", &form.email), ("Password", &form.password)]
    };

    let height = fields.len() as u16 + 5;
    let area = center_rect(f.area(), 50, height);
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    for (i, (label, field)) in fields.iter().enumerate() {
        let style = if i == form.focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{:<10} {}", label, field.rendered()),
            style,
        )));
    }
    lines.push(Line::from(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(notice) = &form.notice {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Enter: submit   Esc: quit",
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(title)),
        area,
    );
}

// ============= shared =============

fn header_row(titles: &[&'static str]) -> Row<'static> {
    Row::new(
        titles
            .iter()
            .map(|t| Cell::from(*t))
            .collect::<Vec<Cell>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD))
}

fn draw_form(
    f: &mut Frame,
    title: &str,
    fields: &[(&str, &LineEdit)],
    focus: usize,
    error: Option<&str>,
) {
    let height = fields.len() as u16 + 5;
    let area = center_rect(f.area(), 52, height);
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    for (i, (label, field)) in fields.iter().enumerate() {
        let style = if i == focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{:<12} {}", label, field.rendered()),
            style,
        )));
    }
    lines.push(Line::from(""));
    match error {
        Some(error) => lines.push(Line::from(Span::styled(
            error.to_owned(),
            Style::default().fg(Color::Red),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Enter: save   Esc: cancel   Tab: next field",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    f.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(title.to_owned())),
        area,
    );
}

fn center_rect(outer: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(outer.width);
    let h = height.min(outer.height);
    Rect {
        x: outer.x + (outer.width - w) / 2,
        y: outer.y + (outer.height - h) / 2,
        width: w,
        height: h,
    }
}
