use std::collections::HashSet;
use std::fmt;

/// Conditions the emulation core reports to its owner.
///
/// Codes are coarse on purpose: a sink keeps at most one active entry per
/// code, so a game hammering a prohibited address does not flood the UI.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IssueCode {
    /// The CPU decoded one of the opcode holes and locked up.
    IllegalOpcode,
    /// A read or write hit 0xFEA0-0xFEFF.
    ProhibitedAccess,
    /// An I/O address with no register behind it.
    UnmappedIo,
    /// A CGB-only register was touched in plain mode, or a DMG-only one in
    /// color mode.
    WrongModeRegister,
    /// Cartridge type byte names a controller we do not emulate.
    UnsupportedCartridge,
    /// Header checksum did not match the header bytes.
    HeaderChecksum,
}

impl IssueCode {
    pub const ALL: [IssueCode; 6] = [
        IssueCode::IllegalOpcode,
        IssueCode::ProhibitedAccess,
        IssueCode::UnmappedIo,
        IssueCode::WrongModeRegister,
        IssueCode::UnsupportedCartridge,
        IssueCode::HeaderChecksum,
    ];
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Fatal,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Issue {
    pub code: IssueCode,
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn new(code: IssueCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

/// Receiver for issues raised by the core.
pub trait IssueSink {
    fn set_issue(&mut self, issue: Issue);
    fn resolve_issue(&mut self, code: IssueCode);

    fn is_active(&self, _code: IssueCode) -> bool {
        false
    }
}

/// Default sink: forwards every issue to the `log` facade and remembers
/// which codes are currently raised.
#[derive(Default, Debug)]
pub struct LogIssueSink {
    active: HashSet<IssueCode>,
}

impl LogIssueSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl IssueSink for LogIssueSink {
    fn set_issue(&mut self, issue: Issue) {
        let first = self.active.insert(issue.code);
        match issue.severity {
            Severity::Fatal => log::error!("{issue}"),
            Severity::Warning if first => log::warn!("{issue}"),
            Severity::Warning => log::debug!("{issue}"),
            Severity::Info => log::info!("{issue}"),
            Severity::Debug => log::debug!("{issue}"),
        }
    }

    fn resolve_issue(&mut self, code: IssueCode) {
        if self.active.remove(&code) {
            log::info!("issue {code:?} resolved");
        }
    }

    fn is_active(&self, code: IssueCode) -> bool {
        self.active.contains(&code)
    }
}
