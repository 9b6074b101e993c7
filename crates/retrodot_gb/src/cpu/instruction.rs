use lazy_static::lazy_static;

/// An opcode as it appears in the instruction stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Opcode {
    Plain(u8),
    /// Second byte of a `0xCB`-prefixed instruction.
    Prefixed(u8),
}

/// 8-bit operand slot, in opcode encoding order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum R8 {
    B,
    C,
    D,
    E,
    H,
    L,
    /// Memory at the address in HL.
    HlIndirect,
    A,
}

impl R8 {
    const ALL: [R8; 8] = [
        R8::B,
        R8::C,
        R8::D,
        R8::E,
        R8::H,
        R8::L,
        R8::HlIndirect,
        R8::A,
    ];

    fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0x07) as usize]
    }

    #[inline]
    pub fn is_memory(self) -> bool {
        self == R8::HlIndirect
    }
}

/// 16-bit operand used by loads and 16-bit arithmetic.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum R16 {
    BC,
    DE,
    HL,
    SP,
}

impl R16 {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => R16::BC,
            1 => R16::DE,
            2 => R16::HL,
            _ => R16::SP,
        }
    }
}

/// 16-bit operand used by PUSH/POP, where AF replaces SP.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum R16Stack {
    BC,
    DE,
    HL,
    AF,
}

impl R16Stack {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => R16Stack::BC,
            1 => R16Stack::DE,
            2 => R16Stack::HL,
            _ => R16Stack::AF,
        }
    }
}

/// Pointer operand for `LD (rr),A` / `LD A,(rr)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum R16Mem {
    BC,
    DE,
    /// HL, incremented after the access.
    HLI,
    /// HL, decremented after the access.
    HLD,
}

impl R16Mem {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => R16Mem::BC,
            1 => R16Mem::DE,
            2 => R16Mem::HLI,
            _ => R16Mem::HLD,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cond {
    NZ,
    Z,
    NC,
    C,
}

impl Cond {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Cond::NZ,
            1 => Cond::Z,
            2 => Cond::NC,
            _ => Cond::C,
        }
    }
}

/// Accumulator ALU operation, in opcode encoding order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

/// Rotate/shift group of the prefixed table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RotOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl RotOp {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => RotOp::Rlc,
            1 => RotOp::Rrc,
            2 => RotOp::Rl,
            3 => RotOp::Rr,
            4 => RotOp::Sla,
            5 => RotOp::Sra,
            6 => RotOp::Swap,
            _ => RotOp::Srl,
        }
    }
}

/// Decoded behaviour of an opcode together with its operand selectors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    /// One of the eleven opcode holes that hard-lock the CPU.
    Illegal,
    /// The `0xCB` escape itself.
    Prefix,

    LdR16Imm(R16),
    LdMemA(R16Mem),
    LdAMem(R16Mem),
    LdImm16Sp,
    IncR16(R16),
    DecR16(R16),
    AddHl(R16),
    IncR8(R8),
    DecR8(R8),
    LdR8Imm(R8),
    LdR8R8(R8, R8),

    Rlca,
    Rrca,
    Rla,
    Rra,
    Daa,
    Cpl,
    Scf,
    Ccf,

    AluR8(AluOp, R8),
    AluImm(AluOp),

    Jr,
    JrCond(Cond),
    Jp,
    JpCond(Cond),
    JpHl,
    Call,
    CallCond(Cond),
    Ret,
    RetCond(Cond),
    Reti,
    Rst(u8),
    Push(R16Stack),
    Pop(R16Stack),

    LdhImmA,
    LdhAImm,
    LdhCA,
    LdhAC,
    LdImm16A,
    LdAImm16,
    AddSpImm,
    LdHlSpImm,
    LdSpHl,

    Rot(RotOp, R8),
    Bit(u8, R8),
    Res(u8, R8),
    Set(u8, R8),
}

/// An opcode bound to the operation it performs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operation: Operation,
}

impl Instruction {
    pub const NOP: Instruction = Instruction {
        opcode: Opcode::Plain(0x00),
        operation: Operation::Nop,
    };

    /// Resolve an opcode against the dispatch tables.
    ///
    /// Both tables cover all 256 byte values, so lookup cannot fail.
    pub fn lookup(opcode: Opcode) -> Instruction {
        match opcode {
            Opcode::Plain(byte) => PLAIN_TABLE[byte as usize],
            Opcode::Prefixed(byte) => PREFIXED_TABLE[byte as usize],
        }
    }
}

lazy_static! {
    static ref PLAIN_TABLE: [Instruction; 256] = std::array::from_fn(|i| Instruction {
        opcode: Opcode::Plain(i as u8),
        operation: decode_plain(i as u8),
    });
    static ref PREFIXED_TABLE: [Instruction; 256] = std::array::from_fn(|i| Instruction {
        opcode: Opcode::Prefixed(i as u8),
        operation: decode_prefixed(i as u8),
    });
}

/// Decode an unprefixed opcode using the x/y/z/p/q octal fields.
fn decode_plain(opcode: u8) -> Operation {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = y >> 1;
    let q = y & 0x01;

    match (x, z) {
        (0, 0) => match y {
            0 => Operation::Nop,
            1 => Operation::LdImm16Sp,
            2 => Operation::Stop,
            3 => Operation::Jr,
            _ => Operation::JrCond(Cond::from_bits(y - 4)),
        },
        (0, 1) if q == 0 => Operation::LdR16Imm(R16::from_bits(p)),
        (0, 1) => Operation::AddHl(R16::from_bits(p)),
        (0, 2) if q == 0 => Operation::LdMemA(R16Mem::from_bits(p)),
        (0, 2) => Operation::LdAMem(R16Mem::from_bits(p)),
        (0, 3) if q == 0 => Operation::IncR16(R16::from_bits(p)),
        (0, 3) => Operation::DecR16(R16::from_bits(p)),
        (0, 4) => Operation::IncR8(R8::from_bits(y)),
        (0, 5) => Operation::DecR8(R8::from_bits(y)),
        (0, 6) => Operation::LdR8Imm(R8::from_bits(y)),
        (0, _) => match y {
            0 => Operation::Rlca,
            1 => Operation::Rrca,
            2 => Operation::Rla,
            3 => Operation::Rra,
            4 => Operation::Daa,
            5 => Operation::Cpl,
            6 => Operation::Scf,
            _ => Operation::Ccf,
        },
        (1, _) if opcode == 0x76 => Operation::Halt,
        (1, _) => Operation::LdR8R8(R8::from_bits(y), R8::from_bits(z)),
        (2, _) => Operation::AluR8(AluOp::from_bits(y), R8::from_bits(z)),
        (_, 0) => match y {
            0..=3 => Operation::RetCond(Cond::from_bits(y)),
            4 => Operation::LdhImmA,
            5 => Operation::AddSpImm,
            6 => Operation::LdhAImm,
            _ => Operation::LdHlSpImm,
        },
        (_, 1) if q == 0 => Operation::Pop(R16Stack::from_bits(p)),
        (_, 1) => match p {
            0 => Operation::Ret,
            1 => Operation::Reti,
            2 => Operation::JpHl,
            _ => Operation::LdSpHl,
        },
        (_, 2) => match y {
            0..=3 => Operation::JpCond(Cond::from_bits(y)),
            4 => Operation::LdhCA,
            5 => Operation::LdImm16A,
            6 => Operation::LdhAC,
            _ => Operation::LdAImm16,
        },
        (_, 3) => match y {
            0 => Operation::Jp,
            1 => Operation::Prefix,
            6 => Operation::Di,
            7 => Operation::Ei,
            _ => Operation::Illegal,
        },
        (_, 4) => match y {
            0..=3 => Operation::CallCond(Cond::from_bits(y)),
            _ => Operation::Illegal,
        },
        (_, 5) if q == 0 => Operation::Push(R16Stack::from_bits(p)),
        (_, 5) if p == 0 => Operation::Call,
        (_, 5) => Operation::Illegal,
        (_, 6) => Operation::AluImm(AluOp::from_bits(y)),
        _ => Operation::Rst(y * 8),
    }
}

fn decode_prefixed(opcode: u8) -> Operation {
    let y = (opcode >> 3) & 0x07;
    let reg = R8::from_bits(opcode);
    match opcode >> 6 {
        0 => Operation::Rot(RotOp::from_bits(y), reg),
        1 => Operation::Bit(y, reg),
        2 => Operation::Res(y, reg),
        _ => Operation::Set(y, reg),
    }
}
