#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sweeper_core::{Pacing, SweepEvent, SweepSettings};
use sweeper_engine::{MailSurface, StatusSink, SurfaceError, UnitHandle};

/// How the fake mailbox behaves for one keyword.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Pages that must be deleted before the search comes back empty.
    pub pages: u32,
    /// Count label shown while anything matches.
    pub count: Option<u64>,
    pub open_failures: u32,
    pub select_unavailable: bool,
    pub session_lost_on_select: bool,
    /// Empty probes that never answer.
    pub stalled_probes: u32,
}

impl Script {
    pub fn pages(pages: u32) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }
}

/// In-memory mailbox recording every call it receives.
#[derive(Default)]
pub struct FakeSurface {
    scripts: HashMap<String, Script>,
    open: HashMap<UnitHandle, String>,
    next: u64,
    pub calls: Vec<String>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, keyword: &str, script: Script) -> Self {
        self.scripts.insert(keyword.to_string(), script);
        self
    }

    pub fn calls_named(&self, name: &str) -> Vec<String> {
        let prefix = format!("{name} ");
        self.calls
            .iter()
            .filter_map(|call| call.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls.iter().position(|c| c == call)
    }

    fn keyword(&self, handle: UnitHandle) -> Result<String, SurfaceError> {
        self.open
            .get(&handle)
            .cloned()
            .ok_or_else(|| SurfaceError::session_lost(format!("{handle} closed")))
    }

    fn script_mut(&mut self, keyword: &str) -> &mut Script {
        self.scripts.entry(keyword.to_string()).or_default()
    }
}

#[async_trait::async_trait]
impl MailSurface for FakeSurface {
    async fn open_unit(&mut self, keyword: &str) -> Result<UnitHandle, SurfaceError> {
        self.calls.push(format!("open {keyword}"));
        let script = self.script_mut(keyword);
        if script.open_failures > 0 {
            script.open_failures -= 1;
            return Err(SurfaceError::transient("page did not load"));
        }
        self.next += 1;
        let handle = UnitHandle(self.next);
        self.open.insert(handle, keyword.to_string());
        Ok(handle)
    }

    async fn focus(&mut self, handle: UnitHandle) -> Result<(), SurfaceError> {
        let keyword = self.keyword(handle)?;
        self.calls.push(format!("focus {keyword}"));
        Ok(())
    }

    async fn is_empty(&mut self, handle: UnitHandle) -> Result<bool, SurfaceError> {
        let keyword = self.keyword(handle)?;
        let script = self.script_mut(&keyword);
        if script.stalled_probes > 0 {
            script.stalled_probes -= 1;
            std::future::pending::<()>().await;
        }
        Ok(script.pages == 0)
    }

    async fn result_count(&mut self, handle: UnitHandle) -> Result<Option<u64>, SurfaceError> {
        let keyword = self.keyword(handle)?;
        let script = self.script_mut(&keyword);
        Ok(if script.pages == 0 { None } else { script.count })
    }

    async fn select_all(&mut self, handle: UnitHandle) -> Result<bool, SurfaceError> {
        let keyword = self.keyword(handle)?;
        self.calls.push(format!("select {keyword}"));
        let script = self.script_mut(&keyword);
        if script.session_lost_on_select {
            return Err(SurfaceError::session_lost("tab was closed"));
        }
        Ok(!script.select_unavailable)
    }

    async fn delete_selected(&mut self, handle: UnitHandle) -> Result<bool, SurfaceError> {
        let keyword = self.keyword(handle)?;
        self.calls.push(format!("delete {keyword}"));
        let script = self.script_mut(&keyword);
        script.pages = script.pages.saturating_sub(1);
        Ok(true)
    }

    async fn close_unit(&mut self, handle: UnitHandle) -> Result<(), SurfaceError> {
        if let Some(keyword) = self.open.remove(&handle) {
            self.calls.push(format!("close {keyword}"));
        }
        Ok(())
    }

    async fn park(&mut self) -> Result<(), SurfaceError> {
        self.calls.push("park".to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SweepEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<SweepEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl StatusSink for RecordingSink {
    fn emit(&self, event: &SweepEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub fn quick_settings() -> SweepSettings {
    SweepSettings {
        pacing: Pacing::disabled(),
        ..SweepSettings::default()
    }
}

pub fn keywords(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("sender{i}@bulk.example")).collect()
}
