use std::time::Instant;

use tracing::{debug, info, trace};

use crate::column::ColumnRegistry;
use crate::domain::{GridConfig, HELP_TEXT, Message};
use crate::grid::Grid;
use crate::inputter::{InputResult, Inputter};
use crate::record::{Record, RecordStore};

#[derive(Debug, PartialEq)]
pub enum Status {
    Ready,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    Table,
    Record,
    Columns,
    Popup,
    CmdInput,
}

/// Everything the UI needs to draw one frame.
#[derive(Debug, Default, Clone)]
pub struct UIData {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub selected_row: usize,
    pub selected_column: usize,
    pub sorted_column: Option<usize>, // Index into header
    pub show_pagination: bool,
    pub current_page: usize,
    pub page_count: usize,
    pub nrows: usize, // Rows matching the search
    pub total: usize,
    pub search: InputResult,
    pub active_cmdinput: bool,
    pub search_pending: bool,
    pub show_popup: bool,
    pub popup_title: String,
    pub popup_message: String,
    pub show_columns: bool,
    pub columns: Vec<(String, bool)>,
    pub column_curser: usize,
    pub status_message: String,
}

pub struct Model {
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    name: String,
    grid: Grid,
    uidata: UIData,
    input: Inputter,
    last_input: InputResult,
    curser_row: usize,
    curser_column: usize,
    column_curser: usize,
    status_message: String,
}

impl Model {
    pub fn init(config: &GridConfig, name: impl Into<String>, store: RecordStore) -> Self {
        let total = store.len();
        let mut model = Self {
            status: Status::Ready,
            modus: Modus::Table,
            previous_modus: Modus::Table,
            name: name.into(),
            grid: Grid::new(store, ColumnRegistry::default(), config),
            uidata: UIData::default(),
            input: Inputter::default(),
            last_input: InputResult::default(),
            curser_row: 0,
            curser_column: 0,
            column_curser: 0,
            status_message: String::new(),
        };
        model.set_status_message(format!("Loaded {total} records"));
        model.update_table_data();
        model
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    /// While the search line is active, keys go to the line editor untranslated.
    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::CmdInput
    }

    pub fn quit(&mut self) {
        self.status = Status::Quitting;
    }

    /// Applies a due debounced search. Returns true if the table changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let pending = self.grid.search_pending();
        if self.grid.tick(now) {
            self.clamp_page();
            self.set_status_message(format!(
                "{} of {} records match",
                self.grid.filtered_len(),
                self.grid.store().len()
            ));
            self.update_table_data();
            true
        } else {
            if pending != self.grid.search_pending() {
                // The pending value was dropped as unchanged.
                self.update_table_data();
            }
            false
        }
    }

    pub fn update(&mut self, message: Option<Message>, now: Instant) {
        let Some(msg) = message else {
            return;
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);
        match self.modus {
            Modus::Table => match msg {
                Message::Quit => self.quit(),
                Message::MoveDown => self.move_selection_down(),
                Message::MoveUp => self.curser_row = self.curser_row.saturating_sub(1),
                Message::MoveLeft => self.curser_column = self.curser_column.saturating_sub(1),
                Message::MoveRight => self.move_selection_right(),
                Message::NextPage => self.change_page(self.grid.state().current_page + 1),
                Message::PrevPage => {
                    self.change_page(self.grid.state().current_page.saturating_sub(1))
                }
                Message::FirstPage => self.change_page(1),
                Message::LastPage => self.change_page(self.grid.page_count()),
                Message::Sort => self.sort_current_column(),
                Message::Search => self.enter_cmd_mode(),
                Message::Columns => self.switch_modus(Modus::Columns),
                Message::Enter => self.show_record(),
                Message::Exit => self.clear_search(now),
                Message::Help => self.show_popup("Help", HELP_TEXT.to_string()),
                _ => (),
            },
            Modus::Columns => match msg {
                Message::Quit => self.quit(),
                Message::MoveDown => {
                    if self.column_curser + 1 < self.grid.columns().len() {
                        self.column_curser += 1;
                    }
                }
                Message::MoveUp => self.column_curser = self.column_curser.saturating_sub(1),
                Message::ToggleColumn | Message::Enter => self.toggle_column(),
                Message::Columns | Message::Exit => self.switch_modus(Modus::Table),
                _ => (),
            },
            Modus::Record | Modus::Popup => match msg {
                Message::Quit => self.quit(),
                Message::Enter | Message::Exit => self.close_popup(),
                _ => (),
            },
            Modus::CmdInput => {
                if let Message::RawKey(key) = msg {
                    self.raw_input(key, now);
                }
            }
        }
        self.update_table_data();
    }

    // -------------------- Control handling functions ---------------------- //

    fn switch_modus(&mut self, modus: Modus) {
        self.previous_modus = self.modus;
        self.modus = modus;
    }

    fn enter_cmd_mode(&mut self) {
        trace!("Entering search mode ...");
        self.switch_modus(Modus::CmdInput);
        self.input.resume();
        self.last_input = self.input.get();
    }

    fn raw_input(&mut self, key: ratatui::crossterm::event::KeyEvent, now: Instant) {
        self.last_input = self.input.read(key);
        if self.last_input.changed {
            self.grid.on_search_input(&self.last_input.input, now);
        }
        if self.last_input.finished {
            trace!("Search input finished: \"{}\"", self.last_input.input);
            self.switch_modus(Modus::Table);
        }
    }

    fn clear_search(&mut self, now: Instant) {
        if self.input.get().input.is_empty() && self.grid.state().search_text.is_empty() {
            return;
        }
        self.input.clear();
        self.last_input = self.input.get();
        self.grid.on_search_input("", now);
        self.set_status_message("Search cleared");
    }

    fn change_page(&mut self, page: usize) {
        let last = std::cmp::max(self.grid.page_count(), 1);
        let page = page.clamp(1, last);
        if page != self.grid.state().current_page {
            self.grid.on_page_change(page);
            self.curser_row = 0;
        }
    }

    // The grid does not clamp pages, after a new search the current page might be gone.
    fn clamp_page(&mut self) {
        let last = std::cmp::max(self.grid.page_count(), 1);
        if self.grid.state().current_page > last {
            self.grid.on_page_change(last);
        }
        self.curser_row = std::cmp::min(
            self.curser_row,
            self.grid.page_rows().len().saturating_sub(1),
        );
    }

    fn move_selection_down(&mut self) {
        if self.curser_row + 1 < self.grid.page_rows().len() {
            self.curser_row += 1;
        }
    }

    fn move_selection_right(&mut self) {
        if self.curser_column + 1 < self.grid.columns().visible().count() {
            self.curser_column += 1;
        }
    }

    fn sort_current_column(&mut self) {
        let Some(column) = self.grid.columns().visible().nth(self.curser_column) else {
            self.set_status_message("No visible column to sort by");
            return;
        };
        let (key, label) = (column.key().to_string(), column.label.clone());
        let start_time = Instant::now();
        self.grid.on_sort_request(&key);
        debug!(
            "Sorting by \"{key}\" took {}ms",
            start_time.elapsed().as_millis()
        );
        self.set_status_message(format!("Sorted by {label}"));
    }

    fn toggle_column(&mut self) {
        if let Some(visible) = self.grid.toggle_column_at(self.column_curser) {
            let visible_count = self.grid.columns().visible().count();
            self.curser_column =
                std::cmp::min(self.curser_column, visible_count.saturating_sub(1));
            self.clamp_page();
            let label = self
                .grid
                .columns()
                .get(self.column_curser)
                .map(|c| c.label.clone())
                .unwrap_or_default();
            info!("Column \"{label}\" visible: {visible}");
            self.set_status_message(format!(
                "{} {label}",
                if visible { "Showing" } else { "Hiding" }
            ));
        }
    }

    fn selected_record(&self) -> Option<&Record> {
        let idx = *self.grid.page_rows().get(self.curser_row)?;
        self.grid.store().get(idx)
    }

    fn show_record(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };
        let message = Self::format_record(record);
        self.show_popup("Record", message);
        self.modus = Modus::Record;
    }

    fn format_record(record: &Record) -> String {
        let data = record.data();
        let fields = [
            ("Id", data.id.clone()),
            ("Active", data.is_active.to_string()),
            ("Balance", data.balance.to_string()),
            ("Age", data.age.to_string()),
            ("Name", format!("{} {}", data.name.first, data.name.last)),
            ("Company", data.company.clone()),
            ("Email", data.email.clone()),
            ("Address", data.address.clone()),
            ("Tags", data.tags.join(", ")),
            ("Favorite Fruit", data.favorite_fruit.clone()),
            ("Picture", data.picture.clone()),
        ];
        fields
            .iter()
            .map(|(label, value)| format!("{label:<15} {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn show_popup(&mut self, title: &str, message: String) {
        self.switch_modus(Modus::Popup);
        self.uidata.popup_title = title.to_string();
        self.uidata.popup_message = message;
    }

    fn close_popup(&mut self) {
        trace!("Close popup ...");
        self.switch_modus(self.previous_modus);
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    fn update_table_data(&mut self) {
        let grid = &self.grid;
        let visible: Vec<_> = grid.columns().visible().collect();
        let sort_key = grid.state().sort_key.as_ref();

        let rows: Vec<Vec<String>> = grid
            .page_records()
            .iter()
            .map(|record| {
                visible
                    .iter()
                    .map(|c| record.resolve(&c.path))
                    .collect::<Vec<String>>()
            })
            .collect();

        self.uidata = UIData {
            name: self.name.clone(),
            header: visible.iter().map(|c| c.label.clone()).collect(),
            rows,
            selected_row: self.curser_row,
            selected_column: self.curser_column,
            sorted_column: sort_key
                .and_then(|key| visible.iter().position(|c| &c.path == key)),
            show_pagination: grid.show_pagination(),
            current_page: grid.state().current_page,
            page_count: grid.page_count(),
            nrows: grid.filtered_len(),
            total: grid.store().len(),
            search: self.input.get(),
            active_cmdinput: self.modus == Modus::CmdInput,
            search_pending: grid.search_pending(),
            show_popup: matches!(self.modus, Modus::Popup | Modus::Record),
            popup_title: std::mem::take(&mut self.uidata.popup_title),
            popup_message: std::mem::take(&mut self.uidata.popup_message),
            show_columns: self.modus == Modus::Columns,
            columns: grid
                .columns()
                .iter()
                .map(|c| (c.label.clone(), c.visible))
                .collect(),
            column_curser: self.column_curser,
            status_message: self.status_message.clone(),
        };
    }
}
