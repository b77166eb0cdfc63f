use core::fmt;

use fxhash::FxHashMap;

use crate::circuit::component::{Component, ComponentId, Placement};
use crate::circuit::kind::ComponentKind;

/// Unique identifier of a wire in a circuit
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct WireId(u32);

impl WireId {
    /// Create an identifier from its raw value
    pub fn from_raw(id: u32) -> WireId {
        WireId(id)
    }

    /// Raw value of the identifier
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Directed connection from an output pin to an input pin
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Wire {
    /// Identifier of the wire
    pub id: WireId,
    /// Driving component
    pub from: ComponentId,
    /// Output pin of the driving component
    pub from_pin: usize,
    /// Driven component
    pub to: ComponentId,
    /// Input pin of the driven component
    pub to_pin: usize,
}

/// Representation of a circuit as components connected by wires
///
/// Component order is irrelevant to the logic, but is kept stable: it defines the
/// ordering of inputs and outputs for truth tables, and makes iteration deterministic.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    /// Optional user-visible name
    name: Option<String>,
    components: Vec<Component>,
    wires: Vec<Wire>,
    /// Position of each component in the vector
    index: FxHashMap<ComponentId, usize>,
    next_component: u32,
    next_wire: u32,
}

impl Circuit {
    /// Create a new, empty circuit
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the circuit, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the name of the circuit; an empty name removes it
    pub fn set_name(&mut self, name: &str) {
        let name = name.trim();
        self.name = if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        };
    }

    /// Return the number of components
    pub fn nb_components(&self) -> usize {
        self.components.len()
    }

    /// Return the number of wires
    pub fn nb_wires(&self) -> usize {
        self.wires.len()
    }

    /// Return the number of Input components
    pub fn nb_inputs(&self) -> usize {
        self.components
            .iter()
            .filter(|c| c.kind().is_source())
            .count()
    }

    /// Return the number of Output and Led components
    pub fn nb_outputs(&self) -> usize {
        self.components.iter().filter(|c| c.kind().is_sink()).count()
    }

    /// All components, in insertion order
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// All wires, in insertion order
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Identifiers of the Input components, in circuit order
    pub fn input_ids(&self) -> Vec<ComponentId> {
        self.components
            .iter()
            .filter(|c| c.kind().is_source())
            .map(|c| c.id())
            .collect()
    }

    /// Identifiers of the Output and Led components, in circuit order
    pub fn output_ids(&self) -> Vec<ComponentId> {
        self.components
            .iter()
            .filter(|c| c.kind().is_sink())
            .map(|c| c.id())
            .collect()
    }

    /// Get a component by identifier
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.index.get(&id).map(|i| &self.components[*i])
    }

    /// Get a component by identifier, for modification of its state
    pub(crate) fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        let i = *self.index.get(&id)?;
        Some(&mut self.components[i])
    }

    /// Position of a component in the circuit order
    pub(crate) fn position(&self, id: ComponentId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Component at a given position in the circuit order
    pub(crate) fn component_at_mut(&mut self, i: usize) -> &mut Component {
        &mut self.components[i]
    }

    /// Get a wire by identifier
    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.iter().find(|w| w.id == id)
    }

    /// Find the first component with the given label
    pub fn find_by_label(&self, label: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .find(|c| c.label.as_deref() == Some(label))
            .map(|c| c.id())
    }

    /// Wires leaving each component, indexed by position in the circuit order
    ///
    /// Wires whose endpoints do not exist are skipped.
    pub fn fanout(&self) -> Vec<Vec<Wire>> {
        let mut ret = vec![Vec::new(); self.nb_components()];
        for w in &self.wires {
            if let (Some(i), Some(_)) = (self.position(w.from), self.position(w.to)) {
                ret[i].push(*w);
            }
        }
        ret
    }

    /// Add a component with all pins at false, without placement
    pub fn add(&mut self, kind: ComponentKind) -> ComponentId {
        let id = ComponentId::from_raw(self.next_component);
        self.next_component += 1;
        self.index.insert(id, self.components.len());
        self.components.push(Component::new(id, kind));
        id
    }

    /// Add a labelled component, without placement
    pub fn add_labelled(&mut self, kind: ComponentKind, label: &str) -> ComponentId {
        let id = self.add(kind);
        self.rename_component(id, label);
        id
    }

    /// Add a new Input component
    pub fn add_input(&mut self) -> ComponentId {
        self.add(ComponentKind::Input)
    }

    /// Add a new Output component driven by a component's first output pin
    pub fn add_output(&mut self, driver: ComponentId) -> ComponentId {
        let o = self.add(ComponentKind::Output);
        self.add_wire(driver, 0, o, 0);
        o
    }

    /// Add a gate driven by the first output pin of each of the given components
    pub fn add_gate(&mut self, kind: ComponentKind, drivers: &[ComponentId]) -> ComponentId {
        assert_eq!(drivers.len(), kind.nb_inputs());
        let g = self.add(kind);
        for (pin, d) in drivers.iter().enumerate() {
            self.add_wire(*d, 0, g, pin);
        }
        g
    }

    /// Add a component as the editor does: snapped to the grid, with a default label
    pub fn add_component(&mut self, kind: ComponentKind, x: f64, y: f64) -> ComponentId {
        let id = self.add(kind);
        let nb = self.nb_components();
        let c = &mut self.components[nb - 1];
        c.placement = Placement::snapped(x, y);
        c.label = Some(format!("{}-{}", kind, nb));
        id
    }

    /// Remove a component and all wires connected to it
    ///
    /// Returns false if the component does not exist.
    pub fn remove_component(&mut self, id: ComponentId) -> bool {
        let Some(i) = self.position(id) else {
            return false;
        };
        self.components.remove(i);
        self.wires.retain(|w| w.from != id && w.to != id);
        self.rebuild_index();
        true
    }

    /// Move a component, snapping it to the grid
    pub fn move_component(&mut self, id: ComponentId, x: f64, y: f64) {
        if let Some(c) = self.component_mut(id) {
            let rotation = c.placement.rotation;
            c.placement = Placement::snapped(x, y);
            c.placement.rotation = rotation;
        }
    }

    /// Rotate a component by a quarter turn
    pub fn rotate_component(&mut self, id: ComponentId) {
        if let Some(c) = self.component_mut(id) {
            c.placement.rotation = c.placement.rotation.turn();
        }
    }

    /// Change the label of a component
    pub fn rename_component(&mut self, id: ComponentId, label: &str) {
        if let Some(c) = self.component_mut(id) {
            c.label = Some(label.to_string());
        }
    }

    /// Connect an output pin to an input pin
    ///
    /// Returns None if an endpoint does not exist or a pin is out of range.
    /// An input pin with several drivers is accepted; the last driver to change wins.
    pub fn add_wire(
        &mut self,
        from: ComponentId,
        from_pin: usize,
        to: ComponentId,
        to_pin: usize,
    ) -> Option<WireId> {
        let src = self.component(from)?;
        let dst = self.component(to)?;
        if from_pin >= src.kind().nb_outputs() || to_pin >= dst.kind().nb_inputs() {
            return None;
        }
        let id = WireId::from_raw(self.next_wire);
        self.next_wire += 1;
        self.wires.push(Wire {
            id,
            from,
            from_pin,
            to,
            to_pin,
        });
        Some(id)
    }

    /// Remove a wire; returns false if it does not exist
    pub fn remove_wire(&mut self, id: WireId) -> bool {
        let len = self.wires.len();
        self.wires.retain(|w| w.id != id);
        self.wires.len() != len
    }

    /// Flip the value driven by an Input component
    pub fn toggle_input(&mut self, id: ComponentId) {
        if let Some(c) = self.component_mut(id) {
            if let Some(v) = c.value() {
                c.drive(!v);
            }
        }
    }

    /// Remove all components and wires; the name is kept
    pub fn clear(&mut self) {
        self.components.clear();
        self.wires.clear();
        self.index.clear();
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .components
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id(), i))
            .collect();
    }

    /// Returns the input pins driven by more than one wire
    pub fn multiply_driven_pins(&self) -> Vec<(ComponentId, usize)> {
        let mut count = FxHashMap::<(ComponentId, usize), usize>::default();
        for w in &self.wires {
            *count.entry((w.to, w.to_pin)).or_default() += 1;
        }
        let mut ret: Vec<_> = count
            .into_iter()
            .filter(|(_, nb)| *nb > 1)
            .map(|(pin, _)| pin)
            .collect();
        ret.sort();
        ret
    }

    /// Check consistency of the datastructure
    pub fn check(&self) {
        assert_eq!(self.index.len(), self.components.len());
        for (i, c) in self.components.iter().enumerate() {
            assert_eq!(self.index[&c.id()], i, "Stale index for {}", c.id());
            assert!(c.is_well_formed(), "Invalid pins for {}", c.id());
        }
        for w in &self.wires {
            let Some(src) = self.component(w.from) else {
                panic!("Invalid wire source {}", w.from);
            };
            let Some(dst) = self.component(w.to) else {
                panic!("Invalid wire destination {}", w.to);
            };
            assert!(w.from_pin < src.kind().nb_outputs(), "Invalid pin for {}", w.id);
            assert!(w.to_pin < dst.kind().nb_inputs(), "Invalid pin for {}", w.id);
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}: ")?;
        }
        writeln!(
            f,
            "Circuit with {} inputs, {} outputs, {} components and {} wires:",
            self.nb_inputs(),
            self.nb_outputs(),
            self.nb_components(),
            self.nb_wires()
        )?;
        for c in &self.components {
            writeln!(f, "\t{} = {}", c.id(), c)?;
        }
        for w in &self.wires {
            writeln!(
                f,
                "\t{}: {}.{} -> {}.{}",
                w.id, w.from, w.from_pin, w.to, w.to_pin
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::circuit::{Circuit, ComponentKind, Rotation};

    #[test]
    fn test_basic() {
        let mut c = Circuit::default();
        let i0 = c.add_input();
        let i1 = c.add_input();
        let x = c.add_gate(ComponentKind::Xor, &[i0, i1]);
        let o = c.add_output(x);

        assert_eq!(c.nb_inputs(), 2);
        assert_eq!(c.nb_outputs(), 1);
        assert_eq!(c.nb_components(), 4);
        assert_eq!(c.nb_wires(), 3);
        assert_eq!(c.input_ids(), vec![i0, i1]);
        assert_eq!(c.output_ids(), vec![o]);
        assert_eq!(c.component(x).unwrap().kind(), ComponentKind::Xor);
        c.check();
    }

    #[test]
    fn test_name() {
        let mut c = Circuit::new();
        assert_eq!(c.name(), None);
        c.set_name(" adder ");
        assert_eq!(c.name(), Some("adder"));
        c.add_input();
        assert!(c.to_string().starts_with("adder: Circuit with 1 inputs"));
        c.clear();
        assert_eq!(c.name(), Some("adder"));
        c.set_name("");
        assert_eq!(c.name(), None);
        assert!(c.to_string().starts_with("Circuit with 0 inputs"));
    }

    #[test]
    fn test_add_component() {
        let mut c = Circuit::new();
        let a = c.add_component(ComponentKind::And, 31.0, 49.0);
        let b = c.add_component(ComponentKind::Led, 0.0, 0.0);
        assert_ne!(a, b);
        let ca = c.component(a).unwrap();
        assert_eq!((ca.placement.x, ca.placement.y), (40.0, 40.0));
        assert_eq!(ca.label.as_deref(), Some("AND-1"));
        assert_eq!(c.component(b).unwrap().label.as_deref(), Some("LED-2"));
        assert_eq!(c.find_by_label("LED-2"), Some(b));
        assert_eq!(c.find_by_label("LED-3"), None);

        c.move_component(a, 65.0, 11.0);
        c.rotate_component(a);
        c.move_component(a, 65.0, 11.0);
        let ca = c.component(a).unwrap();
        assert_eq!((ca.placement.x, ca.placement.y), (60.0, 20.0));
        assert_eq!(ca.placement.rotation, Rotation::R90);

        c.rename_component(b, "status");
        assert_eq!(c.find_by_label("status"), Some(b));
    }

    #[test]
    fn test_add_wire() {
        let mut c = Circuit::new();
        let i = c.add_input();
        let n = c.add(ComponentKind::Not);
        let o = c.add(ComponentKind::Output);
        assert!(c.add_wire(i, 0, n, 0).is_some());
        // Out of range pins
        assert!(c.add_wire(i, 1, n, 0).is_none());
        assert!(c.add_wire(n, 0, n, 1).is_none());
        assert!(c.add_wire(o, 0, n, 0).is_none());
        assert!(c.add_wire(n, 0, i, 0).is_none());
        // Missing endpoints
        c.remove_component(o);
        assert!(c.add_wire(n, 0, o, 0).is_none());
        // Multiple drivers are accepted but reported
        assert!(c.add_wire(i, 0, n, 0).is_some());
        assert_eq!(c.multiply_driven_pins(), vec![(n, 0)]);
        c.check();
    }

    #[test]
    fn test_remove() {
        let mut c = Circuit::new();
        let i0 = c.add_input();
        let i1 = c.add_input();
        let g = c.add_gate(ComponentKind::Or, &[i0, i1]);
        let o = c.add_output(g);
        assert!(c.remove_component(i0));
        assert!(!c.remove_component(i0));
        assert_eq!(c.nb_components(), 3);
        assert_eq!(c.nb_wires(), 2);
        assert_eq!(c.component(o).unwrap().kind(), ComponentKind::Output);
        c.check();

        let w = c.wires()[0].id;
        assert!(c.wire(w).is_some());
        assert!(c.remove_wire(w));
        assert!(!c.remove_wire(w));
        assert!(c.wire(w).is_none());
        c.check();

        c.clear();
        assert_eq!(c.nb_components(), 0);
        assert_eq!(c.nb_wires(), 0);
        // Identifiers are never reused
        assert_ne!(c.add_input(), i0);
        c.check();
    }

    #[test]
    fn test_toggle() {
        let mut c = Circuit::new();
        let i = c.add_input();
        let n = c.add_gate(ComponentKind::Not, &[i]);
        c.toggle_input(i);
        assert_eq!(c.component(i).unwrap().value(), Some(true));
        c.toggle_input(i);
        assert_eq!(c.component(i).unwrap().value(), Some(false));
        c.toggle_input(n);
        assert_eq!(c.component(n).unwrap().outputs(), &[false]);
    }

    #[test]
    fn test_fanout() {
        let mut c = Circuit::new();
        let i = c.add_input();
        let a = c.add_output(i);
        let b = c.add_output(i);
        let f = c.fanout();
        assert_eq!(f.len(), 3);
        assert_eq!(f[0].len(), 2);
        assert_eq!(f[0][0].to, a);
        assert_eq!(f[0][1].to, b);
        assert!(f[1].is_empty());
    }
}
