#![forbid(unsafe_code)]

//! Date and option pickers presented as dialogues.
//!
//! Each picker shares its selection between the content view (which edits
//! it on taps) and the confirm provider (which reads it when the dialogue
//! confirms). Both sides hold the same `Rc<RefCell<..>>`; everything runs on
//! the UI thread.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::{Months, NaiveDateTime, TimeDelta};
use popkit_core::color::PackedRgba;
use popkit_core::layout::{Attribute, Constraint, LayoutBinding};
use popkit_core::view::{TextAlign, TextContent, ViewFlags, ViewId, ViewNode, ViewTree};

use super::appearance::Appearance;
use super::content::{ContentView, PopupCommand, PopupInfo};
use super::dialogue::{ContentKind, DEFAULT_CANCEL_TEXT, DEFAULT_CONFIRM_TEXT, Dialogue};
use super::popup::Popup;

/// Default row height of picker rows.
pub const ROW_HEIGHT: f64 = 44.0;

/// Background of the selected option row.
pub const SELECTED_ROW_COLOR: PackedRgba = PackedRgba::rgb(232, 240, 252);

const ROW_TEXT_SIZE: f64 = 16.0;

fn row_text(text: String) -> TextContent {
    TextContent {
        text,
        font_size: ROW_TEXT_SIZE,
        bold: false,
        color: PackedRgba::BLACK,
        align: TextAlign::Center,
    }
}

// ---------------------------------------------------------------------------
// Date picker
// ---------------------------------------------------------------------------

/// Which parts of a date the picker edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DatePickerMode {
    Date,
    Time,
    #[default]
    DateAndTime,
}

/// One editable field of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
}

impl DatePickerMode {
    /// Fields shown for this mode, top to bottom.
    pub fn fields(self) -> &'static [DateField] {
        match self {
            Self::Date => &[DateField::Year, DateField::Month, DateField::Day],
            Self::Time => &[DateField::Hour, DateField::Minute],
            Self::DateAndTime => &[
                DateField::Year,
                DateField::Month,
                DateField::Day,
                DateField::Hour,
                DateField::Minute,
            ],
        }
    }
}

impl DateField {
    /// Step `value` by `delta` units of this field.
    ///
    /// Month arithmetic clamps the day to the end of the target month.
    /// Returns `None` when the result is out of range.
    pub fn step(self, value: NaiveDateTime, delta: i32) -> Option<NaiveDateTime> {
        let months = |n: i32| {
            let m = Months::new(n.unsigned_abs());
            if n >= 0 {
                value.checked_add_months(m)
            } else {
                value.checked_sub_months(m)
            }
        };
        match self {
            Self::Year => months(delta.checked_mul(12)?),
            Self::Month => months(delta),
            Self::Day => value.checked_add_signed(TimeDelta::try_days(i64::from(delta))?),
            Self::Hour => value.checked_add_signed(TimeDelta::try_hours(i64::from(delta))?),
            Self::Minute => value.checked_add_signed(TimeDelta::try_minutes(i64::from(delta))?),
        }
    }

    /// Display text of this field of `value`.
    pub fn format(self, value: NaiveDateTime) -> String {
        let pattern = match self {
            Self::Year => "%Y",
            Self::Month => "%B",
            Self::Day => "%-d",
            Self::Hour => "%H",
            Self::Minute => "%M",
        };
        value.format(pattern).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateState {
    value: NaiveDateTime,
    minimum: Option<NaiveDateTime>,
    maximum: Option<NaiveDateTime>,
}

impl DateState {
    fn clamp(&self, value: NaiveDateTime) -> NaiveDateTime {
        let value = self.minimum.map_or(value, |min| value.max(min));
        self.maximum.map_or(value, |max| value.min(max))
    }
}

#[derive(Debug, Clone, Copy)]
struct DateRow {
    field: DateField,
    decrement: ViewId,
    label: ViewId,
    increment: ViewId,
}

/// Stepper rows, one per field of the mode.
#[derive(Debug)]
struct DateView {
    mode: DatePickerMode,
    state: Rc<RefCell<DateState>>,
    rows: Vec<DateRow>,
}

impl DateView {
    fn refresh(&self, tree: &mut ViewTree) {
        let value = self.state.borrow().value;
        for row in &self.rows {
            if let Some(text) = tree.get_mut(row.label).and_then(|n| n.text.as_mut()) {
                text.text = row.field.format(value);
            }
        }
    }

    fn stepper(symbol: &str) -> ViewNode {
        ViewNode::new("picker.stepper")
            .interactive()
            .text(row_text(symbol.to_owned()))
    }
}

impl ContentView for DateView {
    fn install(
        &mut self,
        tree: &mut ViewTree,
        layout: &mut dyn LayoutBinding,
        parent: ViewId,
    ) -> Option<ViewId> {
        let root = tree.add_subview(parent, ViewNode::new("picker.date"))?;
        let value = self.state.borrow().value;
        self.rows.clear();
        for (i, &field) in self.mode.fields().iter().enumerate() {
            let row = tree.add_subview(root, ViewNode::new("picker.row"))?;
            layout.bind(Constraint::equal(row, Attribute::Leading, root));
            layout.bind(Constraint::equal(row, Attribute::Trailing, root));
            layout.bind(Constraint::equal(row, Attribute::Top, root).constant(i as f64 * ROW_HEIGHT));
            layout.bind(Constraint::fixed(row, Attribute::Height, ROW_HEIGHT));

            let decrement = tree.add_subview(row, Self::stepper("-"))?;
            let label = tree.add_subview(
                row,
                ViewNode::new("picker.value").text(row_text(field.format(value))),
            )?;
            let increment = tree.add_subview(row, Self::stepper("+"))?;
            for (view, edge) in [(decrement, Attribute::Leading), (increment, Attribute::Trailing)] {
                layout.bind(Constraint::equal(view, edge, row));
                layout.bind(Constraint::equal(view, Attribute::Top, row));
                layout.bind(Constraint::equal(view, Attribute::Bottom, row));
                layout.bind(Constraint::fixed(view, Attribute::Width, ROW_HEIGHT));
            }
            layout.bind(Constraint::equal(label, Attribute::Leading, row).constant(ROW_HEIGHT));
            layout.bind(Constraint::equal(label, Attribute::Trailing, row).constant(-ROW_HEIGHT));
            layout.bind(Constraint::equal(label, Attribute::Top, row));
            layout.bind(Constraint::equal(label, Attribute::Bottom, row));

            self.rows.push(DateRow {
                field,
                decrement,
                label,
                increment,
            });
        }
        Some(root)
    }

    fn tap(&mut self, tree: &mut ViewTree, view: ViewId) -> Option<PopupCommand> {
        let (field, delta) = self.rows.iter().find_map(|row| {
            if view == row.decrement {
                Some((row.field, -1))
            } else if view == row.increment {
                Some((row.field, 1))
            } else {
                None
            }
        })?;
        {
            let mut state = self.state.borrow_mut();
            if let Some(next) = field.step(state.value, delta) {
                state.value = state.clamp(next);
            }
            tracing::trace!(?field, delta, value = %state.value, "date stepped");
        }
        self.refresh(tree);
        None
    }
}

/// Popup date picker.
pub struct DatePicker {
    title: String,
    mode: DatePickerMode,
    state: Rc<RefCell<DateState>>,
    cancel_text: String,
    confirm_text: String,
    appearance: Appearance,
    confirm_action: Option<Box<dyn FnOnce(NaiveDateTime)>>,
    cancel_action: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for DatePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePicker")
            .field("title", &self.title)
            .field("mode", &self.mode)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DatePicker {
    /// Date picker starting at the current local time.
    pub fn new(title: impl Into<String>, mode: DatePickerMode) -> Self {
        Self::with_appearance(&Appearance::current(), title, mode)
    }

    pub fn with_appearance(appearance: &Appearance, title: impl Into<String>, mode: DatePickerMode) -> Self {
        Self {
            title: title.into(),
            mode,
            state: Rc::new(RefCell::new(DateState {
                value: chrono::Local::now().naive_local(),
                minimum: None,
                maximum: None,
            })),
            cancel_text: DEFAULT_CANCEL_TEXT.to_owned(),
            confirm_text: DEFAULT_CONFIRM_TEXT.to_owned(),
            appearance: *appearance,
            confirm_action: None,
            cancel_action: None,
        }
    }

    /// Initial date, clamped to the configured range.
    pub fn date(self, value: NaiveDateTime) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.value = state.clamp(value);
        }
        self
    }

    pub fn minimum_date(self, minimum: NaiveDateTime) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.minimum = Some(minimum);
            state.value = state.clamp(state.value);
        }
        self
    }

    pub fn maximum_date(self, maximum: NaiveDateTime) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.maximum = Some(maximum);
            state.value = state.clamp(state.value);
        }
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    /// Called with the selected date on confirm.
    pub fn confirm_action(mut self, action: impl FnOnce(NaiveDateTime) + 'static) -> Self {
        self.confirm_action = Some(Box::new(action));
        self
    }

    /// Called on cancel or a tap outside.
    pub fn cancel_action(mut self, action: impl FnOnce() + 'static) -> Self {
        self.cancel_action = Some(Box::new(action));
        self
    }

    #[inline]
    pub fn mode(&self) -> DatePickerMode {
        self.mode
    }

    /// Currently selected date.
    pub fn selected_date(&self) -> NaiveDateTime {
        self.state.borrow().value
    }

    pub fn into_popup(self) -> Popup {
        let view = DateView {
            mode: self.mode,
            state: Rc::clone(&self.state),
            rows: Vec::new(),
        };
        let state = self.state;
        let provider = move || Some(PopupInfo::Date(state.borrow().value));
        let (confirm_action, cancel_action) = (self.confirm_action, self.cancel_action);
        Dialogue::with_appearance(
            &self.appearance,
            self.title,
            Some(ContentKind::confirm_capable(view, provider)),
        )
        .cancel_text(self.cancel_text)
        .confirm_text(self.confirm_text)
        .positive_action(move |info| {
            if let (Some(action), Some(PopupInfo::Date(date))) = (confirm_action, info) {
                action(date);
            }
        })
        .negative_action(move |_| {
            if let Some(action) = cancel_action {
                action();
            }
        })
        .into_popup()
    }
}

// ---------------------------------------------------------------------------
// Option picker
// ---------------------------------------------------------------------------

/// Rows of every component, side by side.
#[derive(Debug)]
struct OptionsView {
    components: Rc<Vec<Vec<String>>>,
    selection: Rc<RefCell<Vec<usize>>>,
    row_height: f64,
    /// Row views per component.
    rows: Vec<Vec<ViewId>>,
}

impl OptionsView {
    fn refresh(&self, tree: &mut ViewTree) {
        let selection = self.selection.borrow();
        for (component, rows) in self.rows.iter().enumerate() {
            let selected = selection.get(component).copied();
            for (index, &row) in rows.iter().enumerate() {
                if let Some(node) = tree.get_mut(row) {
                    node.background = if selected == Some(index) {
                        SELECTED_ROW_COLOR
                    } else {
                        PackedRgba::TRANSPARENT
                    };
                }
            }
        }
    }
}

impl ContentView for OptionsView {
    fn install(
        &mut self,
        tree: &mut ViewTree,
        layout: &mut dyn LayoutBinding,
        parent: ViewId,
    ) -> Option<ViewId> {
        let root = tree.add_subview(
            parent,
            ViewNode::new("picker.options").flags(ViewFlags::CLIPS_TO_BOUNDS),
        )?;
        let count = self.components.len().max(1) as f64;
        self.rows.clear();
        for (c, options) in self.components.iter().enumerate() {
            let column = tree.add_subview(root, ViewNode::new("picker.column"))?;
            layout.bind(
                Constraint::new(column, Attribute::Leading, root, Attribute::Width)
                    .multiplier(c as f64 / count),
            );
            layout.bind(Constraint::equal(column, Attribute::Width, root).multiplier(1.0 / count));
            layout.bind(Constraint::equal(column, Attribute::Top, root));
            layout.bind(Constraint::equal(column, Attribute::Bottom, root));

            let mut rows = Vec::with_capacity(options.len());
            for (r, title) in options.iter().enumerate() {
                let row = tree.add_subview(
                    column,
                    ViewNode::new("picker.option").interactive().text(row_text(title.clone())),
                )?;
                layout.bind(Constraint::equal(row, Attribute::Leading, column));
                layout.bind(Constraint::equal(row, Attribute::Trailing, column));
                layout.bind(Constraint::equal(row, Attribute::Top, column).constant(r as f64 * self.row_height));
                layout.bind(Constraint::fixed(row, Attribute::Height, self.row_height));
                rows.push(row);
            }
            self.rows.push(rows);
        }
        self.refresh(tree);
        Some(root)
    }

    fn tap(&mut self, tree: &mut ViewTree, view: ViewId) -> Option<PopupCommand> {
        let (component, index) = self.rows.iter().enumerate().find_map(|(c, rows)| {
            rows.iter().position(|&row| row == view).map(|r| (c, r))
        })?;
        if let Some(slot) = self.selection.borrow_mut().get_mut(component) {
            *slot = index;
        }
        tracing::trace!(component, index, "option selected");
        self.refresh(tree);
        None
    }
}

fn selected_titles(components: &[Vec<String>], selection: &[usize]) -> Vec<String> {
    components
        .iter()
        .zip(selection)
        .map(|(options, &i)| options.get(i).cloned().unwrap_or_default())
        .collect()
}

/// Popup option picker with one or more components.
pub struct OptionPicker {
    title: String,
    components: Rc<Vec<Vec<String>>>,
    selection: Rc<RefCell<Vec<usize>>>,
    row_height: f64,
    cancel_text: String,
    confirm_text: String,
    appearance: Appearance,
    confirm_action: Option<Box<dyn FnOnce(Vec<String>)>>,
    cancel_action: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for OptionPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionPicker")
            .field("title", &self.title)
            .field("components", &self.components)
            .field("selection", &self.selection)
            .field("row_height", &self.row_height)
            .finish_non_exhaustive()
    }
}

impl OptionPicker {
    /// Single-component picker.
    pub fn new<I>(title: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::multi(title, [options.into_iter().map(Into::into).collect::<Vec<String>>()])
    }

    /// Picker with one column per component.
    pub fn multi<C, I>(title: impl Into<String>, components: C) -> Self
    where
        C: IntoIterator<Item = I>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::with_appearance(&Appearance::current(), title, components)
    }

    pub fn with_appearance<C, I>(appearance: &Appearance, title: impl Into<String>, components: C) -> Self
    where
        C: IntoIterator<Item = I>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let components: Vec<Vec<String>> = components
            .into_iter()
            .map(|c| c.into_iter().map(Into::into).collect())
            .collect();
        let selection = vec![0; components.len()];
        Self {
            title: title.into(),
            components: Rc::new(components),
            selection: Rc::new(RefCell::new(selection)),
            row_height: ROW_HEIGHT,
            cancel_text: DEFAULT_CANCEL_TEXT.to_owned(),
            confirm_text: DEFAULT_CONFIRM_TEXT.to_owned(),
            appearance: *appearance,
            confirm_action: None,
            cancel_action: None,
        }
    }

    pub fn row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    /// Called with one selected title per component on confirm.
    pub fn confirm_action(mut self, action: impl FnOnce(Vec<String>) + 'static) -> Self {
        self.confirm_action = Some(Box::new(action));
        self
    }

    pub fn cancel_action(mut self, action: impl FnOnce() + 'static) -> Self {
        self.cancel_action = Some(Box::new(action));
        self
    }

    /// Select `row` in `component`. Returns `false` if either is out of range.
    pub fn select(&mut self, component: usize, row: usize) -> bool {
        let in_range = self.components.get(component).is_some_and(|c| row < c.len());
        if in_range {
            if let Some(slot) = self.selection.borrow_mut().get_mut(component) {
                *slot = row;
            }
        }
        in_range
    }

    pub fn components(&self) -> &[Vec<String>] {
        &self.components
    }

    /// Selected row index per component.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.selection.borrow().clone()
    }

    /// Selected title per component.
    pub fn selected_titles(&self) -> Vec<String> {
        selected_titles(&self.components, &self.selection.borrow())
    }

    pub fn into_popup(self) -> Popup {
        let view = OptionsView {
            components: Rc::clone(&self.components),
            selection: Rc::clone(&self.selection),
            row_height: self.row_height,
            rows: Vec::new(),
        };
        let (components, selection) = (self.components, self.selection);
        let provider = move || {
            Some(PopupInfo::Options(selected_titles(
                &components,
                &selection.borrow(),
            )))
        };
        let (confirm_action, cancel_action) = (self.confirm_action, self.cancel_action);
        Dialogue::with_appearance(
            &self.appearance,
            self.title,
            Some(ContentKind::confirm_capable(view, provider)),
        )
        .cancel_text(self.cancel_text)
        .confirm_text(self.confirm_text)
        .positive_action(move |info| {
            if let (Some(action), Some(PopupInfo::Options(options))) = (confirm_action, info) {
                action(options);
            }
        })
        .negative_action(move |_| {
            if let Some(action) = cancel_action {
                action();
            }
        })
        .into_popup()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::presentation::PresentationPhase;
    use chrono::NaiveDate;
    use popkit_core::event::Event;
    use popkit_core::geometry::{Point, Size};
    use std::time::Duration;

    const HOST: Size = Size {
        width: 400.0,
        height: 600.0,
    };

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn shown(popup: Popup) -> Popup {
        let mut popup = popup;
        popup.show(HOST).unwrap();
        popup.advance(Duration::from_millis(400));
        assert_eq!(popup.phase(), PresentationPhase::Presented);
        popup
    }

    fn centers(popup: &Popup, name: &str) -> Vec<Point> {
        fn walk(tree: &ViewTree, id: ViewId, name: &str, out: &mut Vec<ViewId>) {
            if tree.get(id).is_some_and(|n| n.name == name) {
                out.push(id);
            }
            for &c in tree.children(id) {
                walk(tree, c, name, out);
            }
        }
        let mut ids = Vec::new();
        walk(popup.tree(), popup.view().unwrap(), name, &mut ids);
        ids.iter()
            .map(|&id| popup.tree().absolute_frame(id).unwrap().center())
            .collect()
    }

    fn tap(popup: &mut Popup, location: Point) {
        assert!(popup.handle_event(&Event::Tap { location }));
    }

    #[test]
    fn month_step_clamps_day() {
        let jan31 = at(2024, 1, 31, 9, 0);
        assert_eq!(DateField::Month.step(jan31, 1), Some(at(2024, 2, 29, 9, 0)));
        assert_eq!(DateField::Year.step(at(2024, 2, 29, 0, 0), 1), Some(at(2025, 2, 28, 0, 0)));
        assert_eq!(DateField::Minute.step(at(2024, 1, 1, 0, 0), -1), Some(at(2023, 12, 31, 23, 59)));
    }

    #[test]
    fn mode_fields() {
        assert_eq!(DatePickerMode::Date.fields().len(), 3);
        assert_eq!(DatePickerMode::Time.fields(), &[DateField::Hour, DateField::Minute]);
        assert_eq!(DatePickerMode::DateAndTime.fields().len(), 5);
    }

    #[test]
    fn range_clamps_initial_date() {
        let picker = DatePicker::new("When", DatePickerMode::Date)
            .minimum_date(at(2024, 1, 1, 0, 0))
            .maximum_date(at(2024, 12, 31, 0, 0))
            .date(at(2030, 6, 1, 0, 0));
        assert_eq!(picker.selected_date(), at(2024, 12, 31, 0, 0));
    }

    #[test]
    fn stepping_then_confirm_delivers_date() {
        let got = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&got);
        let popup = DatePicker::new("When", DatePickerMode::Date)
            .date(at(2024, 3, 10, 12, 0))
            .confirm_action(move |d| *sink.borrow_mut() = Some(d))
            .into_popup();
        let mut popup = shown(popup);
        // Steppers in row order: year -, year +, month -, month +, day -, day +.
        let steppers = centers(&popup, "picker.stepper");
        assert_eq!(steppers.len(), 6);
        tap(&mut popup, steppers[5]);
        tap(&mut popup, steppers[5]);
        tap(&mut popup, steppers[2]);
        let confirm = centers(&popup, "dialogue.confirm")[0];
        tap(&mut popup, confirm);
        assert_eq!(*got.borrow(), Some(at(2024, 2, 12, 12, 0)));
    }

    #[test]
    fn stepping_updates_label() {
        let popup = DatePicker::new("When", DatePickerMode::Time)
            .date(at(2024, 3, 10, 7, 5))
            .into_popup();
        let mut popup = shown(popup);
        let steppers = centers(&popup, "picker.stepper");
        tap(&mut popup, steppers[1]);
        let labels: Vec<String> = popup
            .render()
            .into_iter()
            .filter_map(|cmd| cmd.text.map(|t| t.text))
            .collect();
        assert!(labels.contains(&"08".to_string()));
        assert!(labels.contains(&"05".to_string()));
    }

    #[test]
    fn date_cancel_runs_cancel_action() {
        let canceled = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&canceled);
        let popup = DatePicker::new("When", DatePickerMode::Date)
            .cancel_action(move || *flag.borrow_mut() = true)
            .into_popup();
        let mut popup = shown(popup);
        let cancel = centers(&popup, "dialogue.cancel")[0];
        tap(&mut popup, cancel);
        assert!(*canceled.borrow());
    }

    #[test]
    fn option_picker_selects_per_component() {
        let got = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&got);
        let picker = OptionPicker::multi("Size", [vec!["S", "M", "L"], vec!["Red", "Blue"]])
            .confirm_action(move |options| *sink.borrow_mut() = options);
        assert_eq!(picker.selected_titles(), vec!["S".to_string(), "Red".to_string()]);
        let mut popup = shown(picker.into_popup());
        let options = centers(&popup, "picker.option");
        assert_eq!(options.len(), 5);
        tap(&mut popup, options[2]);
        tap(&mut popup, options[4]);
        let confirm = centers(&popup, "dialogue.confirm")[0];
        tap(&mut popup, confirm);
        assert_eq!(*got.borrow(), vec!["L".to_string(), "Blue".to_string()]);
    }

    #[test]
    fn option_columns_split_width() {
        let popup = shown(OptionPicker::multi("Size", [vec!["a"], vec!["b"]]).into_popup());
        let options = centers(&popup, "picker.option");
        let container = popup.container_frame().unwrap();
        assert!((options[0].x - (container.x + container.width * 0.25)).abs() < 1e-9);
        assert!((options[1].x - (container.x + container.width * 0.75)).abs() < 1e-9);
    }

    #[test]
    fn select_out_of_range_is_rejected() {
        let mut picker = OptionPicker::new("One", ["x", "y"]);
        assert!(picker.select(0, 1));
        assert!(!picker.select(0, 2));
        assert!(!picker.select(1, 0));
        assert_eq!(picker.selected_rows(), vec![1]);
        assert_eq!(picker.components().len(), 1);
    }
}
