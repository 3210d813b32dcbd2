//! Scripts evaluated in a Gmail tab.
//!
//! Gmail keeps hidden copies of toolbars and counters in the DOM for views
//! that are not on screen, so every lookup skips elements without an
//! `offsetParent`.
#![cfg_attr(not(feature = "browser"), allow(dead_code))]

pub(crate) const EMPTY_BANNER_JS: &str =
    "document.body.innerText.includes('No messages matched your search')";

pub(crate) const COUNT_LABELS_JS: &str = r#"
Array.from(document.querySelectorAll('span'))
    .filter((el) => el.offsetParent !== null)
    .map((el) => el.textContent || '')
    .filter((text) => text.includes(' of '))
"#;

pub(crate) const SELECT_ALL_JS: &str = r#"
(() => {
    const selectors = [
        "div[aria-label='Select']",
        "div[aria-label='Select all']",
        "span[role='checkbox']",
        "div[role='checkbox']",
    ];
    for (const selector of selectors) {
        for (const el of document.querySelectorAll(selector)) {
            if (el.offsetParent !== null) { el.click(); return true; }
        }
    }
    return false;
})()
"#;

pub(crate) const DELETE_JS: &str = r#"
(() => {
    for (const el of document.querySelectorAll("[aria-label='Delete']")) {
        if (el.offsetParent !== null) { el.click(); return true; }
    }
    return false;
})()
"#;

pub(crate) const SENDERS_JS: &str = r#"
Array.from(document.querySelectorAll('tr.zA')).map((row) => {
    const tagged = row.querySelector('span[email]');
    if (tagged) { return tagged.getAttribute('email') || tagged.textContent || ''; }
    const name = row.querySelector('.yP');
    return name ? (name.textContent || '') : '';
})
"#;

pub(crate) const OLDER_JS: &str = r#"
(() => {
    for (const el of document.querySelectorAll("div[aria-label='Older']")) {
        if (el.getAttribute('aria-disabled') !== 'true' && el.offsetParent !== null) {
            el.click();
            return true;
        }
    }
    return false;
})()
"#;
