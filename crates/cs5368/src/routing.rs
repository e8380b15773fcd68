//! Capture routing graph
//!
//! Static topology handed to the routing framework:
//!
//! ```text
//! AIN1 ─┐                ┌─ AIN1 Capture ─[Switch]─ TDM1
//!       ├─ AIN12 (ADC) ──┤
//! AIN2 ─┘                └─ AIN2 Capture ─[Switch]─ TDM2
//!  ...          AIN34 / AIN56 / AIN78 likewise          ...
//! ```
//!
//! Widgets live in a fixed table and edges are index pairs into it. Nothing
//! here touches the bus; the framework uses the answers to decide which
//! converter power bits and capture switches to drive.

use thiserror_no_std::Error;

use crate::registers::Register;

/// Handle of a widget in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeId(u8);

impl NodeId {
    /// Position in [`RoutingGraph::widgets`].
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a widget is, and the register bit behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetKind {
    /// Analog input pin.
    Input,
    /// Stereo ADC pair, powered while its PDN bit is clear.
    Converter {
        /// Bit in the Power-Down register.
        power_shift: u8,
    },
    /// Capture path gate, open while its MUTE bit is clear.
    Switch {
        /// Bit in the Mute register (the input channel, zero based).
        channel: u8,
    },
    /// TDM output slot of the named PCM stream.
    Stream {
        /// Stream the slot belongs to.
        stream_name: &'static str,
        /// Slot within the TDM frame.
        slot: u8,
    },
}

/// Named node of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Widget {
    /// Widget name as registered with the framework.
    pub name: &'static str,
    /// Widget kind.
    pub kind: WidgetKind,
}

/// Directed `source → sink` connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Edge {
    /// Widget the signal enters.
    pub sink: NodeId,
    /// Name of the control gating the edge, if any.
    pub control: Option<&'static str>,
    /// Widget the signal leaves.
    pub source: NodeId,
}

/// Topology query failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RoutingError {
    /// No widget with that name or id.
    #[error("unknown widget")]
    UnknownWidget,
    /// Widget is not a capture stream.
    #[error("widget is not a capture stream")]
    NotAStream,
    /// Widget is not a capture switch.
    #[error("widget is not a capture switch")]
    NotASwitch,
    /// Widget is not a converter.
    #[error("widget is not a converter")]
    NotAConverter,
}

const fn input(name: &'static str) -> Widget {
    Widget {
        name,
        kind: WidgetKind::Input,
    }
}

const fn adc(name: &'static str, power_shift: u8) -> Widget {
    Widget {
        name,
        kind: WidgetKind::Converter { power_shift },
    }
}

const fn switch(name: &'static str, channel: u8) -> Widget {
    Widget {
        name,
        kind: WidgetKind::Switch { channel },
    }
}

const fn tdm(name: &'static str, slot: u8) -> Widget {
    Widget {
        name,
        kind: WidgetKind::Stream {
            stream_name: crate::dai::CAPTURE_STREAM,
            slot,
        },
    }
}

const fn route(sink: u8, control: Option<&'static str>, source: u8) -> Edge {
    Edge {
        sink: NodeId(sink),
        control,
        source: NodeId(source),
    }
}

// Table layout: inputs 0..8, converters 8..12, switches 12..20, streams 20..28.
const AIN: u8 = 0;
const ADC: u8 = 8;
const SW: u8 = 12;
const TDM: u8 = 20;

const WIDGETS: [Widget; 28] = [
    input("AIN1"),
    input("AIN2"),
    input("AIN3"),
    input("AIN4"),
    input("AIN5"),
    input("AIN6"),
    input("AIN7"),
    input("AIN8"),
    adc("AIN12", 0),
    adc("AIN34", 1),
    adc("AIN56", 2),
    adc("AIN78", 3),
    switch("AIN1 Capture", 0),
    switch("AIN2 Capture", 1),
    switch("AIN3 Capture", 2),
    switch("AIN4 Capture", 3),
    switch("AIN5 Capture", 4),
    switch("AIN6 Capture", 5),
    switch("AIN7 Capture", 6),
    switch("AIN8 Capture", 7),
    tdm("TDM1", 0),
    tdm("TDM2", 1),
    tdm("TDM3", 2),
    tdm("TDM4", 3),
    tdm("TDM5", 4),
    tdm("TDM6", 5),
    tdm("TDM7", 6),
    tdm("TDM8", 7),
];

const SWITCH: Option<&str> = Some("Switch");

#[allow(clippy::arithmetic_side_effects)]
const EDGES: [Edge; 24] = [
    route(ADC, None, AIN),
    route(ADC, None, AIN + 1),
    route(ADC + 1, None, AIN + 2),
    route(ADC + 1, None, AIN + 3),
    route(ADC + 2, None, AIN + 4),
    route(ADC + 2, None, AIN + 5),
    route(ADC + 3, None, AIN + 6),
    route(ADC + 3, None, AIN + 7),
    route(SW, SWITCH, ADC),
    route(SW + 1, SWITCH, ADC),
    route(SW + 2, SWITCH, ADC + 1),
    route(SW + 3, SWITCH, ADC + 1),
    route(SW + 4, SWITCH, ADC + 2),
    route(SW + 5, SWITCH, ADC + 2),
    route(SW + 6, SWITCH, ADC + 3),
    route(SW + 7, SWITCH, ADC + 3),
    route(TDM, None, SW),
    route(TDM + 1, None, SW + 1),
    route(TDM + 2, None, SW + 2),
    route(TDM + 3, None, SW + 3),
    route(TDM + 4, None, SW + 4),
    route(TDM + 5, None, SW + 5),
    route(TDM + 6, None, SW + 6),
    route(TDM + 7, None, SW + 7),
];

/// Number of converter widgets in the table.
pub const CONVERTER_COUNT: usize = 4;

/// Converters a single stream can depend on.
pub type ConverterSet = heapless::Vec<NodeId, CONVERTER_COUNT>;

// `Visited` and the traversal stack are sized for at most 32 widgets.
const _: () = assert!(WIDGETS.len() <= 32);

/// Immutable widget/edge tables.
#[derive(Debug, Clone, Copy)]
pub struct RoutingGraph {
    widgets: &'static [Widget],
    edges: &'static [Edge],
}

impl RoutingGraph {
    /// CS5368 capture topology.
    pub const fn cs5368() -> Self {
        Self {
            widgets: &WIDGETS,
            edges: &EDGES,
        }
    }

    /// All widgets; [`NodeId::index`] addresses this slice.
    pub fn widgets(&self) -> &'static [Widget] {
        self.widgets
    }

    /// All edges.
    pub fn edges(&self) -> &'static [Edge] {
        self.edges
    }

    /// Widget behind `id`.
    pub fn node(&self, id: NodeId) -> Result<&'static Widget, RoutingError> {
        self.widgets
            .get(id.index())
            .ok_or(RoutingError::UnknownWidget)
    }

    /// Look a widget up by name.
    pub fn find(&self, name: &str) -> Result<NodeId, RoutingError> {
        self.ids()
            .find(|&id| self.node(id).is_ok_and(|w| w.name == name))
            .ok_or(RoutingError::UnknownWidget)
    }

    /// Every capture stream widget, in slot order.
    pub fn streams(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids_of(|kind| matches!(kind, WidgetKind::Stream { .. }))
    }

    /// Every converter widget.
    pub fn converters(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids_of(|kind| matches!(kind, WidgetKind::Converter { .. }))
    }

    /// Edges entering `sink`.
    pub fn sources(&self, sink: NodeId) -> impl Iterator<Item = &'static Edge> + '_ {
        self.edges.iter().filter(move |edge| edge.sink == sink)
    }

    /// Converters reachable backward from `stream`.
    ///
    /// These must be powered while the stream captures.
    pub fn power_dependencies(&self, stream: NodeId) -> Result<ConverterSet, RoutingError> {
        if !matches!(self.node(stream)?.kind, WidgetKind::Stream { .. }) {
            return Err(RoutingError::NotAStream);
        }

        let mut found = ConverterSet::new();
        let mut visited = Visited::default();
        let mut stack: heapless::Vec<NodeId, 32> = heapless::Vec::new();
        visited.insert(stream);
        let _ = stack.push(stream);

        while let Some(node) = stack.pop() {
            if matches!(self.node(node)?.kind, WidgetKind::Converter { .. })
                && !found.contains(&node)
            {
                // The table holds exactly `CONVERTER_COUNT` converters.
                let _ = found.push(node);
            }
            for edge in self.sources(node) {
                if visited.insert(edge.source) {
                    // Each widget is pushed at most once and the table holds
                    // fewer than 32.
                    let _ = stack.push(edge.source);
                }
            }
        }

        found.sort_unstable();
        Ok(found)
    }

    /// Mute register bit gating a capture switch.
    pub fn switch_bit(&self, switch: NodeId) -> Result<(Register, u8), RoutingError> {
        match self.node(switch)?.kind {
            WidgetKind::Switch { channel } => Ok((Register::Mute, channel)),
            _ => Err(RoutingError::NotASwitch),
        }
    }

    /// Power-down register bit of a converter.
    pub fn converter_power_bit(&self, converter: NodeId) -> Result<(Register, u8), RoutingError> {
        match self.node(converter)?.kind {
            WidgetKind::Converter { power_shift } => Ok((Register::PowerDown, power_shift)),
            _ => Err(RoutingError::NotAConverter),
        }
    }

    fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..u8::try_from(self.widgets.len()).unwrap_or(u8::MAX)).map(NodeId)
    }

    fn ids_of(&self, pred: fn(&WidgetKind) -> bool) -> impl Iterator<Item = NodeId> + '_ {
        self.ids()
            .filter(move |&id| self.node(id).is_ok_and(|w| pred(&w.kind)))
    }
}

impl Default for RoutingGraph {
    fn default() -> Self {
        Self::cs5368()
    }
}

/// Visited set over node ids below 32. The widget table is checked against
/// that bound at compile time; a larger id would read as always new.
#[derive(Default)]
struct Visited(u32);

impl Visited {
    /// Returns `true` if `id` was not yet present.
    fn insert(&mut self, id: NodeId) -> bool {
        let bit = 1u32.checked_shl(u32::from(id.0)).unwrap_or(0);
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    fn graph() -> RoutingGraph {
        RoutingGraph::cs5368()
    }

    #[test]
    fn converter_set_fits_every_converter() {
        assert_eq!(graph().converters().count(), CONVERTER_COUNT);
        let all: ConverterSet = graph().converters().collect();
        assert_eq!(all.len(), CONVERTER_COUNT);
    }

    #[test]
    fn names_are_unique_and_findable() {
        let g = graph();
        for (i, widget) in g.widgets().iter().enumerate() {
            assert_eq!(g.find(widget.name).unwrap().index(), i);
        }
        assert_eq!(g.find("AIN9"), Err(RoutingError::UnknownWidget));
    }

    #[test]
    fn edges_connect_adjacent_layers() {
        let g = graph();
        for edge in g.edges() {
            let src = g.node(edge.source).unwrap().kind;
            let sink = g.node(edge.sink).unwrap().kind;
            let ok = matches!(
                (src, sink),
                (WidgetKind::Input, WidgetKind::Converter { .. })
                    | (WidgetKind::Converter { .. }, WidgetKind::Switch { .. })
                    | (WidgetKind::Switch { .. }, WidgetKind::Stream { .. })
            );
            assert!(ok, "{edge:?}");
            assert_eq!(
                edge.control.is_some(),
                matches!(sink, WidgetKind::Switch { .. })
            );
        }
    }

    #[test]
    fn each_input_pair_feeds_one_converter() {
        let g = graph();
        for (pair, adc) in ["AIN12", "AIN34", "AIN56", "AIN78"].iter().enumerate() {
            let adc = g.find(adc).unwrap();
            let inputs: Vec<_> = g
                .sources(adc)
                .map(|e| g.node(e.source).unwrap().name)
                .collect();
            let expected = [
                ["AIN1", "AIN2"],
                ["AIN3", "AIN4"],
                ["AIN5", "AIN6"],
                ["AIN7", "AIN8"],
            ][pair];
            assert_eq!(inputs, expected);
        }
    }

    #[test]
    fn every_stream_depends_on_exactly_one_converter() {
        let g = graph();
        let mut uses = [0usize; 4];
        for stream in g.streams() {
            let deps = g.power_dependencies(stream).unwrap();
            assert_eq!(deps.len(), 1);
            let (_, shift) = g.converter_power_bit(deps[0]).unwrap();
            uses[usize::from(shift)] += 1;
        }
        assert_eq!(uses, [2, 2, 2, 2]);
    }

    #[test]
    fn tdm3_needs_ain34() {
        let g = graph();
        let deps = g.power_dependencies(g.find("TDM3").unwrap()).unwrap();
        assert_eq!(deps.as_slice(), [g.find("AIN34").unwrap()]);
    }

    #[test]
    fn power_dependencies_rejects_non_streams() {
        let g = graph();
        let adc = g.find("AIN12").unwrap();
        assert_eq!(g.power_dependencies(adc), Err(RoutingError::NotAStream));
        assert_eq!(
            g.power_dependencies(NodeId(200)),
            Err(RoutingError::UnknownWidget)
        );
    }

    #[test]
    fn switch_bits_follow_channel_numbers() {
        let g = graph();
        for n in 1..=8u8 {
            let name = format!("AIN{n} Capture");
            let sw = g.find(&name).unwrap();
            assert_eq!(g.switch_bit(sw), Ok((Register::Mute, n - 1)));
        }
        let input = g.find("AIN1").unwrap();
        assert_eq!(g.switch_bit(input), Err(RoutingError::NotASwitch));
    }

    #[test]
    fn converter_power_bits() {
        let g = graph();
        let bits: Vec<_> = g
            .converters()
            .map(|c| g.converter_power_bit(c).unwrap())
            .collect();
        assert_eq!(
            bits,
            [
                (Register::PowerDown, 0),
                (Register::PowerDown, 1),
                (Register::PowerDown, 2),
                (Register::PowerDown, 3),
            ]
        );
        let tdm1 = g.find("TDM1").unwrap();
        assert_eq!(g.converter_power_bit(tdm1), Err(RoutingError::NotAConverter));
    }
}
