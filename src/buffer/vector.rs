use crate::foundation::core::{PixmapFlags, Rgba8, VECTOR_INITIAL_CAPACITY};
use crate::foundation::error::{PixmapError, PixmapResult};

/// Opcode of a vector path instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VecOpcode {
    SetFillEnable = 0,
    SetFillColor = 1,
    SetStrokeWidth = 2,
    SetStrokeColor = 3,
    MoveTo = 4,
    LineTo = 5,
    CubicTo = 6,
}

impl VecOpcode {
    /// Number of operand slots following the opcode slot.
    pub const fn operand_count(self) -> usize {
        match self {
            Self::SetFillEnable
            | Self::SetFillColor
            | Self::SetStrokeWidth
            | Self::SetStrokeColor => 1,
            Self::MoveTo | Self::LineTo => 2,
            Self::CubicTo => 6,
        }
    }

    pub const fn sets_color(self) -> bool {
        matches!(self, Self::SetFillColor | Self::SetStrokeColor)
    }
}

/// One encoded instruction: the opcode together with its operands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VecCmd {
    SetFillEnable(i32),
    /// Packed `A<<24 | B<<16 | G<<8 | R`.
    SetFillColor(u32),
    SetStrokeWidth(i32),
    /// Packed `A<<24 | B<<16 | G<<8 | R`.
    SetStrokeColor(u32),
    MoveTo([f32; 2]),
    LineTo([f32; 2]),
    /// Two control points, then the end point.
    CubicTo([f32; 2], [f32; 2], [f32; 2]),
}

impl VecCmd {
    pub fn opcode(&self) -> VecOpcode {
        match self {
            Self::SetFillEnable(_) => VecOpcode::SetFillEnable,
            Self::SetFillColor(_) => VecOpcode::SetFillColor,
            Self::SetStrokeWidth(_) => VecOpcode::SetStrokeWidth,
            Self::SetStrokeColor(_) => VecOpcode::SetStrokeColor,
            Self::MoveTo(_) => VecOpcode::MoveTo,
            Self::LineTo(_) => VecOpcode::LineTo,
            Self::CubicTo(..) => VecOpcode::CubicTo,
        }
    }

    /// Slots occupied in the stream: opcode plus operands.
    pub fn slots(&self) -> usize {
        1 + self.opcode().operand_count()
    }
}

/// Growable stream of vector path instructions.
///
/// Capacity is accounted in slots (one per opcode and one per operand) and
/// grows as `2 * capacity + needed + 16`.
#[derive(Clone, Debug)]
pub struct VectorCanvas {
    width: u32,
    height: u32,
    cmds: Vec<VecCmd>,
    used: usize,
    capacity: usize,
    flags: PixmapFlags,
    char_positions: Vec<i32>,
}

impl VectorCanvas {
    pub fn new(width: u32, height: u32) -> PixmapResult<Self> {
        let mut cmds = Vec::new();
        cmds.try_reserve(VECTOR_INITIAL_CAPACITY / 2)?;
        Ok(Self {
            width,
            height,
            cmds,
            used: 0,
            capacity: VECTOR_INITIAL_CAPACITY,
            flags: PixmapFlags::empty(),
            char_positions: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Slots written so far.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Slots available before the next growth.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn flags(&self) -> PixmapFlags {
        self.flags
    }

    pub fn is_colorized(&self) -> bool {
        self.flags.contains(PixmapFlags::COLORIZED)
    }

    /// Glyph x positions recorded by a text renderer, if any.
    pub fn char_positions(&self) -> &[i32] {
        &self.char_positions
    }

    pub fn set_char_positions(&mut self, positions: Vec<i32>) {
        self.char_positions = positions;
    }

    pub fn commands(&self) -> &[VecCmd] {
        &self.cmds
    }

    pub fn iter(&self) -> impl Iterator<Item = &VecCmd> {
        self.cmds.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    fn ensure_capacity(&mut self, slots: usize) -> PixmapResult<()> {
        if self.used + slots > self.capacity {
            self.capacity = 2 * self.capacity + slots + 16;
            // Every record takes at least two slots.
            let records = self.capacity / 2;
            self.cmds.try_reserve(records.saturating_sub(self.cmds.len()))?;
        }
        Ok(())
    }

    /// Append one instruction.
    pub fn emit(&mut self, cmd: VecCmd) -> PixmapResult<()> {
        let slots = cmd.slots();
        self.ensure_capacity(slots)?;
        if cmd.opcode().sets_color() {
            self.flags.insert(PixmapFlags::COLORIZED);
        }
        self.cmds.push(cmd);
        self.used += slots;
        Ok(())
    }

    /// Append an instruction that takes a single integer operand.
    pub fn emit_i1(&mut self, op: VecOpcode, value: i32) -> PixmapResult<()> {
        let cmd = match op {
            VecOpcode::SetFillEnable => VecCmd::SetFillEnable(value),
            VecOpcode::SetFillColor => VecCmd::SetFillColor(value as u32),
            VecOpcode::SetStrokeWidth => VecCmd::SetStrokeWidth(value),
            VecOpcode::SetStrokeColor => VecCmd::SetStrokeColor(value as u32),
            _ => return Err(operand_mismatch(op, "one integer")),
        };
        self.emit(cmd)
    }

    /// Append an instruction that takes one point.
    pub fn emit_f1(&mut self, op: VecOpcode, a: [f32; 2]) -> PixmapResult<()> {
        let cmd = match op {
            VecOpcode::MoveTo => VecCmd::MoveTo(a),
            VecOpcode::LineTo => VecCmd::LineTo(a),
            _ => return Err(operand_mismatch(op, "one point")),
        };
        self.emit(cmd)
    }

    /// Append an instruction that takes three points.
    pub fn emit_f3(
        &mut self,
        op: VecOpcode,
        a: [f32; 2],
        b: [f32; 2],
        c: [f32; 2],
    ) -> PixmapResult<()> {
        match op {
            VecOpcode::CubicTo => self.emit(VecCmd::CubicTo(a, b, c)),
            _ => Err(operand_mismatch(op, "three points")),
        }
    }

    pub fn set_fill_enable(&mut self, enable: bool) -> PixmapResult<()> {
        self.emit(VecCmd::SetFillEnable(i32::from(enable)))
    }

    pub fn set_fill_color(&mut self, color: Rgba8) -> PixmapResult<()> {
        self.emit(VecCmd::SetFillColor(color.to_packed()))
    }

    pub fn set_stroke_width(&mut self, width: i32) -> PixmapResult<()> {
        self.emit(VecCmd::SetStrokeWidth(width))
    }

    pub fn set_stroke_color(&mut self, color: Rgba8) -> PixmapResult<()> {
        self.emit(VecCmd::SetStrokeColor(color.to_packed()))
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> PixmapResult<()> {
        self.emit(VecCmd::MoveTo([x, y]))
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> PixmapResult<()> {
        self.emit(VecCmd::LineTo([x, y]))
    }

    pub fn cubic_to(&mut self, c1: [f32; 2], c2: [f32; 2], end: [f32; 2]) -> PixmapResult<()> {
        self.emit(VecCmd::CubicTo(c1, c2, end))
    }

    /// Path geometry as a `kurbo` path; style opcodes are skipped.
    pub fn to_bez_path(&self) -> kurbo::BezPath {
        fn pt(p: [f32; 2]) -> kurbo::Point {
            kurbo::Point::new(f64::from(p[0]), f64::from(p[1]))
        }

        let mut path = kurbo::BezPath::new();
        for cmd in &self.cmds {
            match *cmd {
                VecCmd::MoveTo(p) => path.move_to(pt(p)),
                VecCmd::LineTo(p) => path.line_to(pt(p)),
                VecCmd::CubicTo(a, b, c) => path.curve_to(pt(a), pt(b), pt(c)),
                _ => {}
            }
        }
        path
    }
}

fn operand_mismatch(op: VecOpcode, got: &str) -> PixmapError {
    PixmapError::validation(format!(
        "{op:?} takes {} operand slot(s), not {got}",
        op.operand_count()
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/vector.rs"]
mod tests;
