/// Host keys a frontend can forward to an emulator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Z,
    X,
    A,
    S,
    Enter,
    Escape,
}
