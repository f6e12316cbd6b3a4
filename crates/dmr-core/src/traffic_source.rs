
/// Where a frame entered the repeater. Access lists are kept separately for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficSource {
    /// Received over the air, through the modem
    Rf,
    /// Received from the network
    Net,
}

impl TrafficSource {
    #[inline]
    pub fn is_rf(&self) -> bool {
        matches!(self, TrafficSource::Rf)
    }
}

impl core::fmt::Display for TrafficSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TrafficSource::Rf => write!(f, "RF"),
            TrafficSource::Net => write!(f, "Net"),
        }
    }
}
