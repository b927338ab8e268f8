//! Verb catalog and arity table

/// Every verb the drone understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// `command`, the session handshake
    Handshake,
    Takeoff,
    Land,
    Emergency,
    Query(Query),
    /// `mon`, `moff`, `streamon`, `streamoff`: accepted, no effect
    NoOp,
    Move(MoveDirection),
    Rotate(Rotation),
    Speed,
    Flip,
    Rc,
    Wifi,
}

/// Argument count accepted by a verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, args: usize) -> bool {
        match *self {
            Arity::Exactly(n) => args == n,
            Arity::AtLeast(n) => args >= n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Battery,
    Wifi,
    Speed,
    SerialNumber,
    Height,
    Temperature,
    Barometer,
    Tof,
    Time,
    Attitude,
    Acceleration,
    Sdk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Verb {
    /// Look up a verb; None for anything the drone does not know
    pub fn parse(word: &str) -> Option<Verb> {
        let verb = match word {
            "command" => Verb::Handshake,
            "takeoff" => Verb::Takeoff,
            "land" => Verb::Land,
            "emergency" => Verb::Emergency,
            "battery?" => Verb::Query(Query::Battery),
            "wifi?" => Verb::Query(Query::Wifi),
            "speed?" => Verb::Query(Query::Speed),
            "sn?" => Verb::Query(Query::SerialNumber),
            "height?" => Verb::Query(Query::Height),
            "temp?" => Verb::Query(Query::Temperature),
            "baro?" => Verb::Query(Query::Barometer),
            "tof?" => Verb::Query(Query::Tof),
            "time?" => Verb::Query(Query::Time),
            "attitude?" => Verb::Query(Query::Attitude),
            "acceleration?" => Verb::Query(Query::Acceleration),
            "sdk?" => Verb::Query(Query::Sdk),
            "mon" | "moff" | "streamon" | "streamoff" => Verb::NoOp,
            "up" => Verb::Move(MoveDirection::Up),
            "down" => Verb::Move(MoveDirection::Down),
            "left" => Verb::Move(MoveDirection::Left),
            "right" => Verb::Move(MoveDirection::Right),
            "forward" => Verb::Move(MoveDirection::Forward),
            "backward" => Verb::Move(MoveDirection::Backward),
            "cw" => Verb::Rotate(Rotation::Clockwise),
            "ccw" => Verb::Rotate(Rotation::CounterClockwise),
            "speed" => Verb::Speed,
            "flip" => Verb::Flip,
            "rc" => Verb::Rc,
            "wifi" => Verb::Wifi,
            _ => return None,
        };
        Some(verb)
    }

    pub fn arity(&self) -> Arity {
        match self {
            Verb::Move(_) | Verb::Rotate(_) | Verb::Speed | Verb::Flip => Arity::Exactly(1),
            Verb::Rc => Arity::AtLeast(2),
            Verb::Wifi => Arity::Exactly(2),
            _ => Arity::Exactly(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_verbs() {
        assert_eq!(Verb::parse("command"), Some(Verb::Handshake));
        assert_eq!(Verb::parse("tof?"), Some(Verb::Query(Query::Tof)));
        assert_eq!(Verb::parse("streamoff"), Some(Verb::NoOp));
        assert_eq!(
            Verb::parse("ccw"),
            Some(Verb::Rotate(Rotation::CounterClockwise))
        );
    }

    #[test]
    fn test_verbs_are_case_sensitive() {
        assert_eq!(Verb::parse("Command"), None);
        assert_eq!(Verb::parse("TAKEOFF"), None);
    }

    #[test]
    fn test_arity() {
        assert!(Verb::Takeoff.arity().accepts(0));
        assert!(!Verb::Takeoff.arity().accepts(1));
        assert!(Verb::Rc.arity().accepts(2));
        assert!(Verb::Rc.arity().accepts(7));
        assert!(!Verb::Rc.arity().accepts(1));
        assert!(Verb::Wifi.arity().accepts(2));
        assert!(!Verb::Wifi.arity().accepts(3));
    }
}
