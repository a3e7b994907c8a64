use hint_engine::error::HostError;
use hint_engine::traits::DisplaySink;
use hint_engine::types::{HandleSet, HintKey, HintMapping};

#[derive(Default, Debug, Clone)]
pub struct MockDisplay {
    next_handle: u64,
    pub visible: Option<HandleSet>,
    pub shown: Vec<Vec<HintMapping>>,
    pub hide_calls: usize,
    pub partials: Vec<Vec<HintKey>>,
    pub warnings: Vec<String>,
    pub fail_show: bool,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_showing(&self) -> bool {
        self.visible.is_some()
    }

    pub fn last_shown(&self) -> &[HintMapping] {
        self.shown.last().map(Vec::as_slice).unwrap_or_default()
    }
}

impl DisplaySink for MockDisplay {
    fn show(&mut self, mappings: &[HintMapping]) -> Result<HandleSet, HostError> {
        if self.fail_show {
            return Err(HostError::Display("namespace unavailable".into()));
        }
        let handles = HandleSet(
            mappings
                .iter()
                .map(|_| {
                    self.next_handle += 1;
                    self.next_handle
                })
                .collect(),
        );
        self.shown.push(mappings.to_vec());
        self.visible = Some(handles.clone());
        Ok(handles)
    }

    fn hide(&mut self, handles: HandleSet) {
        assert_eq!(self.visible.as_ref(), Some(&handles), "hid handles that are not shown");
        self.visible = None;
        self.hide_calls += 1;
    }

    fn update_partial(&mut self, handles: &HandleSet, matching: &[HintKey]) {
        assert_eq!(self.visible.as_ref(), Some(handles));
        self.partials.push(matching.to_vec());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}
