use crate::filter::{FilterState, MatchMode};
use crate::rates::GrowthSummary;
use crate::store::RecordStore;
use crate::{JdValue, fixtures, rates, statics};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::path::PathBuf;

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| {
            Ok(Box::new(JdexApp {
                theme_dark: true,
                fixtures_dir: fixtures::default_fixtures_dir(),
                ..Default::default()
            }))
        }),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum Page {
    #[default]
    Explorer,
    Growth,
}

/// One text buffer per known field of the record being edited. `original`
/// lets Apply skip untouched fields so unedited values keep their exact
/// type and content.
#[derive(Clone, Debug)]
struct EditBuffer {
    field: String,
    text: String,
    original: String,
}

/// Deferred row actions; mutating the store mid-table would fight the
/// borrows held by the table closures.
#[derive(Clone, Debug)]
enum RowAction {
    Begin(String),
    Apply,
    Cancel,
}

/// The main application state and GUI logic. Owns the record store, the
/// caller-side filter state, and the growth-demo result.
#[derive(Default)]
struct JdexApp {
    page: Page,
    store: RecordStore,
    filter: FilterState,

    fixtures_dir: PathBuf,
    crosswalk_loaded: bool,
    dialog_dir: Option<PathBuf>,

    edit_buffers: Vec<EditBuffer>,

    // Growth page: computed once on first show; Err holds the banner text.
    growth: Option<Result<GrowthSummary, String>>,

    status: String,
    last_error: Option<String>,
    about_open: bool,
    theme_dark: bool,
}

impl JdexApp {
    fn ensure_crosswalk_loaded(&mut self) {
        if self.crosswalk_loaded {
            return;
        }
        self.crosswalk_loaded = true;
        self.reload_fixture();
    }

    /// (Re)load the bundled collection. Any failure collapses the explorer
    /// to an empty collection plus a visible message; filter state is
    /// deliberately left alone.
    fn reload_fixture(&mut self) {
        let path = self.fixtures_dir.join(statics::FIXTURE_CROSSWALK);
        match fixtures::load_crosswalk(&path) {
            Ok(records) => {
                self.store.load(records);
                self.edit_buffers.clear();
                self.status = format!("Loaded {}", path.display());
                self.last_error = None;
            }
            Err(e) => {
                self.store.load(Vec::new());
                self.edit_buffers.clear();
                self.last_error = Some(format!("{} {e:#}", statics::EN_ERR_FIXTURE_PREFIX));
            }
        }
    }

    fn load_growth(&mut self) {
        let result = fixtures::load_growth_fixtures(&self.fixtures_dir)
            .map(|fx| rates::summarize_growth(&fx))
            .map_err(|e| {
                log::warn!("growth fixtures failed: {e:#}");
                format!("{e:#}")
            });
        self.growth = Some(result);
    }

    fn file_dialog(&self) -> rfd::FileDialog {
        let mut dlg = rfd::FileDialog::new().add_filter("JSON", &["json"]);
        if let Some(dir) = self.dialog_dir.clone() {
            dlg = dlg.set_directory(dir);
        }
        dlg
    }

    /// Import replaces the collection on success and leaves everything
    /// untouched on failure (malformed JSON surfaces as a banner).
    fn import_file(&mut self) {
        let Some(path) = self.file_dialog().pick_file() else {
            return;
        };

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                self.last_error = Some(format!("{} {e}", statics::EN_ERR_IMPORT_PREFIX));
                return;
            }
        };

        match RecordStore::import_text(&text) {
            Ok(records) => {
                let count = records.len();
                self.store.load(records);
                self.edit_buffers.clear();
                self.dialog_dir = path.parent().map(PathBuf::from);
                self.status = format!("Imported {count} records from {}", path.display());
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(format!("{} {e}", statics::EN_ERR_IMPORT_PREFIX));
            }
        }
    }

    /// Export writes the full collection, not the filtered view.
    fn export_file(&mut self) {
        let Some(path) = self
            .file_dialog()
            .set_file_name(RecordStore::default_export_file_name())
            .save_file()
        else {
            return;
        };

        if let Err(e) = self.store.export_to_path(&path) {
            self.last_error = Some(format!("{} {e:#}", statics::EN_ERR_EXPORT_PREFIX));
        } else {
            self.dialog_dir = path.parent().map(PathBuf::from);
            self.status = format!("Exported {}", path.display());
            self.last_error = None;
        }
    }

    fn begin_row_edit(&mut self, identity: &str) {
        let fields: Vec<String> = self.store.known_fields().to_vec();
        match self.store.begin_edit(identity) {
            Ok(draft) => {
                self.edit_buffers = fields
                    .into_iter()
                    .map(|field| {
                        let text = draft.get(&field).map(JdValue::display_text).unwrap_or_default();
                        EditBuffer {
                            field,
                            original: text.clone(),
                            text,
                        }
                    })
                    .collect();
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(format!("{} {e}", statics::EN_ERR_EDIT_PREFIX));
            }
        }
    }

    fn apply_row_edit(&mut self) {
        let buffers = std::mem::take(&mut self.edit_buffers);
        if let Some(draft) = self.store.draft_mut() {
            for buf in &buffers {
                if buf.text == buf.original {
                    continue;
                }
                // Edited text that parses as JSON keeps its parsed type;
                // anything else becomes a plain string.
                let value = JdValue::parse(&buf.text)
                    .unwrap_or_else(|_| JdValue::String(buf.text.clone()));
                draft.insert(buf.field.clone(), value);
            }
        }

        match self.store.commit_edit() {
            Ok(()) => {
                self.status = "Edit applied.".to_string();
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(format!("{} {e}", statics::EN_ERR_EDIT_PREFIX));
            }
        }
    }

    fn cancel_row_edit(&mut self) {
        self.store.cancel_edit();
        self.edit_buffers.clear();
    }

    fn explorer_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(statics::EN_LABEL_SEARCH);
            ui.add(
                egui::TextEdit::singleline(self.filter.query_mut())
                    .hint_text(statics::EN_HINT_SEARCH)
                    .desired_width(240.0),
            );
            if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                self.filter.set_query(statics::EN_EMPTY);
            }

            ui.separator();
            if ui
                .add_enabled(
                    self.filter.is_active(),
                    egui::Button::new(statics::EN_BTN_CLEAR_FILTERS),
                )
                .clicked()
            {
                self.filter.clear();
            }

            ui.separator();
            ui.menu_button(statics::EN_MENU_COLUMNS, |ui| {
                let fields: Vec<String> = self.store.known_fields().to_vec();
                for field in fields {
                    let mut visible = self.store.is_field_visible(&field);
                    if ui.checkbox(&mut visible, field.as_str()).changed() {
                        self.store.set_field_visible(&field, visible);
                    }
                }
            });
        });
    }

    fn explorer_table(&mut self, ui: &mut egui::Ui) {
        if self.store.is_empty() {
            ui.label(statics::EN_STATUS_NO_RECORDS);
            return;
        }

        let columns: Vec<String> = self.store.visible_fields().map(str::to_string).collect();
        let rows: Vec<usize> = self
            .store
            .visible_records(&self.filter)
            .map(|(i, _)| i)
            .collect();

        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
        let mut pending: Option<RowAction> = None;

        let Self {
            store,
            filter,
            edit_buffers,
            ..
        } = self;
        let editing: Option<String> = store.editing_identity().map(str::to_string);

        ui.push_id("explorer_table", |ui| {
            egui::ScrollArea::horizontal().show(ui, |ui| {
                let mut table = TableBuilder::new(ui)
                    .striped(true)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .column(Column::auto().resizable(false));
                for _ in &columns {
                    table = table.column(Column::initial(180.0).resizable(true).clip(true));
                }

                table
                    .header(row_h, |mut header| {
                        header.col(|ui| {
                            ui.strong(statics::EN_EMPTY);
                        });
                        for field in &columns {
                            header.col(|ui| {
                                ui.strong(field.as_str());

                                let active = filter
                                    .field_filter(field)
                                    .is_some_and(|f| !f.is_empty());
                                let glyph = if active {
                                    statics::EN_GLYPH_FILTER_ACTIVE
                                } else {
                                    statics::EN_GLYPH_FILTER
                                };

                                ui.menu_button(glyph, |ui| {
                                    ui.label(statics::EN_LABEL_FILTER);
                                    {
                                        let entry = filter.field_filter_mut(field);
                                        ui.add(
                                            egui::TextEdit::singleline(&mut entry.pattern)
                                                .hint_text(statics::EN_HINT_FILTER)
                                                .desired_width(160.0),
                                        );
                                        let mut exact = entry.mode == MatchMode::Exact;
                                        if ui
                                            .checkbox(&mut exact, statics::EN_CHECKBOX_EXACT)
                                            .changed()
                                        {
                                            entry.mode = if exact {
                                                MatchMode::Exact
                                            } else {
                                                MatchMode::Substring
                                            };
                                        }
                                    }
                                    if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                                        filter.clear_field_filter(field);
                                        ui.close();
                                    }
                                });
                            });
                        }
                    })
                    .body(|mut body| {
                        for &idx in &rows {
                            body.row(row_h, |mut row| {
                                let identity = store.identity_at(idx).unwrap_or_default();
                                let is_editing = editing.as_deref() == Some(identity.as_str());

                                row.col(|ui| {
                                    if is_editing {
                                        if ui.small_button(statics::EN_BTN_APPLY).clicked() {
                                            pending = Some(RowAction::Apply);
                                        }
                                        if ui.small_button(statics::EN_BTN_CANCEL).clicked() {
                                            pending = Some(RowAction::Cancel);
                                        }
                                    } else {
                                        // One edit session at a time.
                                        if ui
                                            .add_enabled(
                                                editing.is_none(),
                                                egui::Button::new(statics::EN_BTN_EDIT).small(),
                                            )
                                            .clicked()
                                        {
                                            pending = Some(RowAction::Begin(identity.clone()));
                                        }
                                        if store.is_edited(&identity) {
                                            ui.weak(statics::EN_BADGE_MODIFIED);
                                        }
                                    }
                                });

                                let record = &store.records()[idx];
                                for field in &columns {
                                    row.col(|ui| {
                                        if is_editing {
                                            if let Some(buf) = edit_buffers
                                                .iter_mut()
                                                .find(|b| b.field == *field)
                                            {
                                                ui.add(
                                                    egui::TextEdit::singleline(&mut buf.text)
                                                        .desired_width(f32::INFINITY),
                                                );
                                            }
                                        } else {
                                            let text = record
                                                .get(field)
                                                .map(JdValue::display_text)
                                                .unwrap_or_default();
                                            ui.add(egui::Label::new(text).truncate());
                                        }
                                    });
                                }
                            });
                        }
                    });
            });
        });

        match pending {
            Some(RowAction::Begin(identity)) => self.begin_row_edit(&identity),
            Some(RowAction::Apply) => self.apply_row_edit(),
            Some(RowAction::Cancel) => self.cancel_row_edit(),
            None => {}
        }
    }

    fn render_explorer(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.explorer_toolbar(ui);
            ui.separator();
            self.explorer_table(ui);
        });
    }

    fn render_growth(&mut self, ctx: &egui::Context) {
        if self.growth.is_none() {
            self.load_growth();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(statics::EN_HEADING_GROWTH);
            ui.label(statics::EN_GROWTH_INTRO);
            ui.separator();

            match &self.growth {
                Some(Ok(summary)) => render_growth_grid(ui, summary),
                Some(Err(msg)) => {
                    ui.colored_label(
                        egui::Color32::RED,
                        format!("{} {msg}", statics::EN_ERR_FIXTURE_PREFIX),
                    );
                }
                None => {}
            }
        });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.page == Page::Explorer {
                        let shown = self.store.visible_records(&self.filter).count();
                        ui.label(format!(
                            "{shown} {} {} {}",
                            statics::EN_STATUS_ROWS_OF,
                            self.store.len(),
                            statics::EN_STATUS_ROWS_SHOWN,
                        ));
                        if self.store.edited_count() > 0 {
                            ui.separator();
                            ui.weak(format!(
                                "{} {}",
                                self.store.edited_count(),
                                statics::EN_BADGE_MODIFIED.to_lowercase()
                            ));
                        }
                    }
                });
            });
        });
    }
}

fn render_growth_grid(ui: &mut egui::Ui, summary: &GrowthSummary) {
    let fmt_area = |v: f64| format!("{v:.1} {}", statics::EN_UNIT_SQM);
    let fmt_rate = |v: Option<f64>| match v {
        Some(v) => format!("{v:.6}"),
        None => statics::EN_LITERAL_UNDEFINED.to_string(),
    };

    egui::Grid::new("growth_stats")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            ui.label(statics::EN_LABEL_AREA_T);
            ui.monospace(fmt_area(summary.area_t_m2));
            ui.end_row();

            ui.label(statics::EN_LABEL_AREA_TN);
            ui.monospace(fmt_area(summary.area_tn_m2));
            ui.end_row();

            ui.label(statics::EN_LABEL_ADMIN_FEATURES);
            ui.monospace(summary.admin_features.to_string());
            ui.end_row();

            ui.label(statics::EN_LABEL_WINDOW);
            ui.monospace(format!("{} - {}", summary.window.t, summary.window.t_n));
            ui.end_row();

            ui.label(statics::EN_LABEL_YEARS);
            ui.monospace(summary.stats.years.to_string());
            ui.end_row();

            ui.label(statics::EN_LABEL_POP_T);
            ui.monospace(format!("{:.0}", summary.window.population_t));
            ui.end_row();

            ui.label(statics::EN_LABEL_POP_TN);
            ui.monospace(format!("{:.0}", summary.window.population_tn));
            ui.end_row();

            ui.label(statics::EN_LABEL_LCR);
            ui.monospace(fmt_rate(summary.stats.lcr));
            ui.end_row();

            ui.label(statics::EN_LABEL_PGR);
            ui.monospace(fmt_rate(summary.stats.pgr));
            ui.end_row();

            ui.label(statics::EN_LABEL_RATIO);
            ui.monospace(fmt_rate(summary.stats.ratio));
            ui.end_row();
        });
}

impl eframe::App for JdexApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_crosswalk_loaded();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                for (page, label) in [
                    (Page::Explorer, statics::EN_PAGE_EXPLORER),
                    (Page::Growth, statics::EN_PAGE_GROWTH),
                ] {
                    if ui.selectable_label(self.page == page, label).clicked() {
                        self.page = page;
                    }
                }

                ui.separator();
                if ui.button(statics::EN_BTN_IMPORT).clicked() {
                    self.import_file();
                }
                if ui
                    .add_enabled(
                        !self.store.is_empty(),
                        egui::Button::new(statics::EN_BTN_EXPORT),
                    )
                    .clicked()
                {
                    self.export_file();
                }
                if ui.button(statics::EN_BTN_RELOAD_FIXTURE).clicked() {
                    self.reload_fixture();
                }

                ui.separator();
                if ui.button(statics::EN_BTN_ABOUT).clicked() {
                    self.about_open = true;
                }
                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }
            });
        });

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        if self.about_open {
            let mut open = self.about_open;
            egui::Window::new(statics::EN_WINDOW_ABOUT)
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.heading(statics::EN_ABOUT_HEADING);
                    ui.horizontal(|ui| {
                        ui.label(statics::EN_ABOUT_VERSION);
                        ui.monospace(env!("CARGO_PKG_VERSION"));
                    });
                    ui.label(statics::EN_ABOUT_BLURB);
                    ui.hyperlink_to(statics::EN_PROJECT_REPO, statics::GITHUB_URL);
                });
            self.about_open = open;
        }

        self.render_status_bar(ctx);

        match self.page {
            Page::Explorer => self.render_explorer(ctx),
            Page::Growth => self.render_growth(ctx),
        }
    }
}
