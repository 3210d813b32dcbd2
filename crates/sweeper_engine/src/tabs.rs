//! Bookkeeping for the tabs a browser session has opened.
//!
//! A tab is parked as pending the moment it exists and only gets a handle once
//! its search has been issued. An open that is cancelled part way leaves the
//! tab pending, and the next open (or shutdown) takes it back for closing.
#![cfg_attr(not(feature = "browser"), allow(dead_code))]

use std::collections::HashMap;

use crate::surface::UnitHandle;

#[derive(Debug)]
pub(crate) struct TabSet<T> {
    open: HashMap<UnitHandle, T>,
    pending: Vec<T>,
    next_handle: u64,
}

impl<T> Default for TabSet<T> {
    fn default() -> Self {
        Self {
            open: HashMap::new(),
            pending: Vec::new(),
            next_handle: 0,
        }
    }
}

impl<T> TabSet<T> {
    /// Parks a freshly created tab and returns it for navigation.
    pub fn begin(&mut self, tab: T) -> &T {
        self.pending.push(tab);
        &self.pending[self.pending.len() - 1]
    }

    /// Promotes the most recently parked tab to an open unit.
    pub fn commit(&mut self) -> Option<UnitHandle> {
        let tab = self.pending.pop()?;
        self.next_handle += 1;
        let handle = UnitHandle(self.next_handle);
        self.open.insert(handle, tab);
        Some(handle)
    }

    /// Takes back the most recently parked tab after a failed navigation.
    pub fn abandon(&mut self) -> Option<T> {
        self.pending.pop()
    }

    /// Tabs left pending by opens that never finished.
    pub fn take_stale(&mut self) -> Vec<T> {
        std::mem::take(&mut self.pending)
    }

    pub fn get(&self, handle: UnitHandle) -> Option<&T> {
        self.open.get(&handle)
    }

    pub fn remove(&mut self, handle: UnitHandle) -> Option<T> {
        self.open.remove(&handle)
    }

    /// Every tab, open or pending, leaving the set empty.
    pub fn drain(&mut self) -> Vec<T> {
        let mut tabs: Vec<T> = self.open.drain().map(|(_, tab)| tab).collect();
        tabs.append(&mut self.pending);
        tabs
    }
}
