use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState},
};

use crate::model::{Model, UIData};

pub const SEARCH_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 1;
pub const STATUSLINE_HEIGHT: u16 = 1;
pub const MAX_COLUMN_WIDTH: u16 = 40;

#[derive(Debug)]
pub struct TableUI {
    max_column_width: u16,
}

impl TableUI {
    pub fn new(max_column_width: u16) -> Self {
        Self { max_column_width }
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        let uidata = model.get_uidata();
        let [search_area, table_area, footer_area, status_area] = Layout::vertical([
            Constraint::Length(SEARCH_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
            Constraint::Length(STATUSLINE_HEIGHT),
        ])
        .areas(frame.area());

        self.render_search(uidata, frame, search_area);
        self.render_table(uidata, frame, table_area);
        if uidata.show_pagination {
            self.render_pagination(uidata, frame, footer_area);
        }
        self.render_statusline(uidata, frame, status_area);

        if uidata.show_columns {
            self.render_column_list(uidata, frame);
        }
        if uidata.show_popup {
            self.render_popup(uidata, frame);
        }
    }

    fn render_search(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let title = if uidata.active_cmdinput {
            " Search ".bold().yellow()
        } else {
            " Search (/) ".bold()
        };
        let mut line = Line::from(uidata.search.input.as_str());
        if uidata.search_pending {
            line.push_span(Span::from(" …").dim());
        }
        let block = Block::bordered()
            .title(title)
            .title_bottom(Line::from(format!(" {} ", uidata.name)).right_aligned())
            .border_set(border::PLAIN);
        frame.render_widget(Paragraph::new(line).block(block), area);

        if uidata.active_cmdinput {
            let x = area.x + 1 + uidata.search.curser_pos as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }

    fn render_table(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        if uidata.header.is_empty() {
            frame.render_widget(
                Paragraph::new("All columns are hidden, press c to show some.")
                    .centered()
                    .dim(),
                area,
            );
            return;
        }

        let header = Row::new(uidata.header.iter().enumerate().map(|(idx, name)| {
            let label = if uidata.sorted_column == Some(idx) {
                format!("{name} ▲")
            } else {
                name.clone()
            };
            Cell::from(label)
        }))
        .style(Style::new().bold().underlined());

        let rows = uidata.rows.iter().map(|row| {
            Row::new(row.iter().enumerate().map(|(cidx, value)| {
                let cell = Cell::from(value.as_str());
                if cidx == uidata.selected_column {
                    cell.style(Style::new().bold())
                } else {
                    cell
                }
            }))
        });

        let widths = self.column_widths(uidata);
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(Style::new().reversed());

        let mut state = TableState::default();
        if !uidata.rows.is_empty() {
            state.select(Some(uidata.selected_row));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn column_widths(&self, uidata: &UIData) -> Vec<Constraint> {
        (0..uidata.header.len())
            .map(|cidx| {
                let content = uidata
                    .rows
                    .iter()
                    .map(|row| row.get(cidx).map(|v| v.chars().count()).unwrap_or(0))
                    .max()
                    .unwrap_or(0);
                let header = uidata.header[cidx].chars().count() + 2;
                let width = std::cmp::max(content, header) as u16;
                Constraint::Length(width.min(self.max_column_width))
            })
            .collect()
    }

    fn render_pagination(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            " ◀ p ".blue().bold(),
            format!(
                "page {}/{}",
                uidata.current_page,
                std::cmp::max(uidata.page_count, 1)
            )
            .into(),
            " n ▶ ".blue().bold(),
            format!(" {} of {} records", uidata.nrows, uidata.total).dim(),
        ]);
        frame.render_widget(Paragraph::new(line).centered(), area);
    }

    fn render_statusline(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::from(format!(" {} ", uidata.status_message)),
            " ? help ".dim(),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_column_list(&self, uidata: &UIData, frame: &mut Frame) {
        let items: Vec<ListItem> = uidata
            .columns
            .iter()
            .map(|(label, visible)| {
                let mark = if *visible { "[x]" } else { "[ ]" };
                ListItem::new(format!("{mark} {label}"))
            })
            .collect();
        let height = items.len() as u16 + 2;
        let list = List::new(items)
            .block(
                Block::bordered()
                    .title(" Columns ".bold())
                    .title_bottom(Line::from(" space toggle, esc close ").centered())
                    .border_set(border::THICK),
            )
            .highlight_style(Style::new().reversed());
        let mut state = ListState::default().with_selected(Some(uidata.column_curser));

        let area = Self::popup_area(frame.area(), 40, height);
        frame.render_widget(Clear, area);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_popup(&self, uidata: &UIData, frame: &mut Frame) {
        let height = uidata.popup_message.lines().count() as u16 + 2;
        let width = uidata
            .popup_message
            .lines()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0) as u16
            + 4;
        let block = Block::bordered()
            .title(format!(" {} ", uidata.popup_title).bold())
            .title_bottom(Line::from(" esc close ").centered())
            .border_set(border::THICK);

        let area = Self::popup_area(frame.area(), width, height);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(uidata.popup_message.as_str()).block(block),
            area,
        );
    }

    fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
        let [area] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        area
    }
}
