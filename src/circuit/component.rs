use std::fmt;

use crate::circuit::kind::ComponentKind;

/// Grid spacing used to snap component positions
pub const GRID_SIZE: f64 = 20.0;

/// Round a coordinate to the nearest multiple of the grid spacing
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    (value / grid).round() * grid
}

/// Unique identifier of a component in a circuit
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    /// Create an identifier from its raw value
    pub fn from_raw(id: u32) -> ComponentId {
        ComponentId(id)
    }

    /// Raw value of the identifier
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Rotation of a component, in quarter turns
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum Rotation {
    /// No rotation
    #[default]
    R0,
    /// 90 degrees
    R90,
    /// 180 degrees
    R180,
    /// 270 degrees
    R270,
}

impl Rotation {
    /// Rotation angle in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Rotate by another quarter turn
    pub fn turn(&self) -> Rotation {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }
}

/// Position and orientation of a component in the editor; never read by the simulation
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Placement {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Orientation
    pub rotation: Rotation,
}

impl Placement {
    /// Create a placement snapped to the grid
    pub fn snapped(x: f64, y: f64) -> Placement {
        Placement {
            x: snap_to_grid(x, GRID_SIZE),
            y: snap_to_grid(y, GRID_SIZE),
            rotation: Rotation::R0,
        }
    }
}

/// A component instance: kind, current pin values and placement
///
/// The input and output vectors always have the size given by the kind. They are only
/// accessible through methods that maintain this invariant.
#[derive(Debug, PartialEq, Clone)]
pub struct Component {
    id: ComponentId,
    kind: ComponentKind,
    inputs: Vec<bool>,
    outputs: Vec<bool>,
    /// Editor placement
    pub placement: Placement,
    /// Optional user-visible name
    pub label: Option<String>,
}

impl Component {
    /// Create a component with all pins at false
    pub fn new(id: ComponentId, kind: ComponentKind) -> Component {
        Component {
            id,
            kind,
            inputs: vec![false; kind.nb_inputs()],
            outputs: vec![false; kind.nb_outputs()],
            placement: Placement::default(),
            label: None,
        }
    }

    /// Identifier of the component
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Kind of the component
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Current values of the input pins
    pub fn inputs(&self) -> &[bool] {
        &self.inputs
    }

    /// Current values of the output pins
    pub fn outputs(&self) -> &[bool] {
        &self.outputs
    }

    /// Label, or the identifier if there is none
    pub fn name(&self) -> String {
        match &self.label {
            Some(l) => l.clone(),
            None => self.id.to_string(),
        }
    }

    /// Value displayed by a sink, or the value driven by a source
    pub fn value(&self) -> Option<bool> {
        if self.kind.is_sink() {
            self.inputs.first().copied()
        } else {
            self.outputs.first().copied()
        }
    }

    /// Set the value of an input pin; ignored if out of range
    pub(crate) fn set_input_pin(&mut self, pin: usize, value: bool) {
        if let Some(v) = self.inputs.get_mut(pin) {
            *v = value;
        }
    }

    /// Replace the output values
    pub(crate) fn set_outputs(&mut self, outputs: Vec<bool>) {
        assert_eq!(outputs.len(), self.kind.nb_outputs());
        self.outputs = outputs;
    }

    /// Drive the value of a source; returns false if the component is not an Input
    pub(crate) fn drive(&mut self, value: bool) -> bool {
        if self.kind.is_source() {
            self.outputs[0] = value;
            true
        } else {
            false
        }
    }

    /// Put all pins back to false
    pub(crate) fn clear_pins(&mut self) {
        self.inputs = vec![false; self.kind.nb_inputs()];
        self.outputs = vec![false; self.kind.nb_outputs()];
    }

    /// Returns whether the pin vectors match the kind
    pub fn is_well_formed(&self) -> bool {
        self.inputs.len() == self.kind.nb_inputs() && self.outputs.len() == self.kind.nb_outputs()
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits =
            |v: &[bool]| -> String { v.iter().map(|b| if *b { '1' } else { '0' }).collect() };
        write!(
            f,
            "{} {} [{}] -> [{}]",
            self.name(),
            self.kind,
            bits(self.inputs.as_slice()),
            bits(self.outputs.as_slice())
        )
    }
}
