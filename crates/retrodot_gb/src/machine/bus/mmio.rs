use retrodot_common::{Issue, IssueCode, Severity};

mod read;
mod write;

pub(super) const JOYP: u16 = 0xFF00;
pub(super) const SB: u16 = 0xFF01;
pub(super) const SC: u16 = 0xFF02;
pub(super) const KEY1: u16 = 0xFF4D;
pub(super) const BOOT_ROM_DISABLE: u16 = 0xFF50;
pub(super) const SVBK: u16 = 0xFF70;

fn prohibited(address: u16, access: &str) -> Issue {
    Issue::new(
        IssueCode::ProhibitedAccess,
        Severity::Warning,
        format!("{access} of prohibited address 0x{address:04X}"),
    )
}

fn unmapped(address: u16, access: &str) -> Issue {
    Issue::new(
        IssueCode::UnmappedIo,
        Severity::Warning,
        format!("{access} of unmapped I/O register 0x{address:04X}"),
    )
}

fn wrong_mode(address: u16, color: bool) -> Issue {
    let message = if color {
        format!("DMG-only register 0x{address:04X} used in color mode")
    } else {
        format!("CGB-only register 0x{address:04X} used in DMG mode")
    };
    Issue::new(IssueCode::WrongModeRegister, Severity::Warning, message)
}
