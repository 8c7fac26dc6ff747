use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;
use gtk4::Label;

#[derive(Clone)]
pub(super) struct ToastRuntime {
    label: Label,
    sequence: Rc<Cell<u64>>,
    duration_ms: u32,
}

impl ToastRuntime {
    pub(super) fn new(label: &Label, duration_ms: u32) -> Self {
        label.add_css_class("toast-badge");
        label.set_visible(false);
        Self {
            label: label.clone(),
            sequence: Rc::new(Cell::new(0)),
            duration_ms,
        }
    }

    pub(super) fn show(&self, message: impl Into<String>) {
        self.label.remove_css_class("error");
        self.present(message.into());
    }

    pub(super) fn show_error(&self, message: impl Into<String>) {
        self.label.add_css_class("error");
        self.present(message.into());
    }

    fn present(&self, message: String) {
        self.label.set_text(&message);
        self.label.set_visible(true);

        let sequence = self.sequence.get().saturating_add(1);
        self.sequence.set(sequence);

        let label = self.label.clone();
        let latest_sequence = self.sequence.clone();
        gtk4::glib::timeout_add_local_once(
            Duration::from_millis(u64::from(self.duration_ms)),
            move || {
                if latest_sequence.get() == sequence {
                    label.set_visible(false);
                }
            },
        );
    }
}
