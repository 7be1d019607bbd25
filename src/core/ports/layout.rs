use crate::core::types::{Bounds, Point, Port, Side};

/// Evenly spaced port placement along an element side
pub struct PortLayout;

impl PortLayout {
    /// Fractions along a side for `count` ports: (i + 1) / (count + 1)
    pub fn compute_positions(count: usize) -> Vec<f64> {
        let slots = (count + 1) as f64;
        (0..count).map(|i| (i + 1) as f64 / slots).collect()
    }

    /// Rewrite the offsets of every port on a side so survivors stay evenly spread
    pub fn relayout(ports: &mut [Port]) {
        let positions = Self::compute_positions(ports.len());
        for (port, offset) in ports.iter_mut().zip(positions) {
            port.offset = offset;
        }
    }

    /// Map a fraction along `side` to an absolute point on `bounds`
    pub fn anchor(bounds: &Bounds, side: Side, offset: f64) -> Point {
        match side {
            Side::Top => Point::new(bounds.x + bounds.width * offset, bounds.y),
            Side::Right => Point::new(bounds.x + bounds.width, bounds.y + bounds.height * offset),
            Side::Bottom => Point::new(bounds.x + bounds.width * offset, bounds.y + bounds.height),
            Side::Left => Point::new(bounds.x, bounds.y + bounds.height * offset),
        }
    }

    /// Absolute position of a laid-out port
    pub fn port_anchor(bounds: &Bounds, port: &Port) -> Point {
        Self::anchor(bounds, port.side, port.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PortId;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_positions_are_evenly_spaced() {
        let positions = PortLayout::compute_positions(3);
        assert_eq!(positions.len(), 3);
        assert!(approx(positions[0], 0.25));
        assert!(approx(positions[1], 0.5));
        assert!(approx(positions[2], 0.75));
    }

    #[test]
    fn test_no_ports_no_positions() {
        assert!(PortLayout::compute_positions(0).is_empty());
    }

    #[test]
    fn test_single_port_is_centered() {
        assert_eq!(PortLayout::compute_positions(1), vec![0.5]);
    }

    #[test]
    fn test_relayout_rewrites_offsets() {
        let mut ports = vec![
            Port::new(PortId::new("left_0"), Side::Left),
            Port::new(PortId::new("left_1"), Side::Left),
        ];
        PortLayout::relayout(&mut ports);
        assert!(approx(ports[0].offset(), 1.0 / 3.0));
        assert!(approx(ports[1].offset(), 2.0 / 3.0));

        ports.remove(0);
        PortLayout::relayout(&mut ports);
        assert!(approx(ports[0].offset(), 0.5));
    }

    #[test]
    fn test_anchor_per_side() {
        let bounds = Bounds::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(PortLayout::anchor(&bounds, Side::Top, 0.5), Point::new(60.0, 20.0));
        assert_eq!(PortLayout::anchor(&bounds, Side::Right, 0.5), Point::new(110.0, 45.0));
        assert_eq!(PortLayout::anchor(&bounds, Side::Bottom, 0.25), Point::new(35.0, 70.0));
        assert_eq!(PortLayout::anchor(&bounds, Side::Left, 0.0), Point::new(10.0, 20.0));
    }
}
