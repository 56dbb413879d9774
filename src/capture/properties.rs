use std::fmt;

use super::CaptureSource;

/// Device properties shown in verbose diagnostics
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Mode,
    Brightness,
    Contrast,
    Saturation,
    Hue,
    Gain,
    Exposure,
}

impl Property {
    /// Report order
    pub const ALL: [Property; 7] = [
        Property::Mode,
        Property::Brightness,
        Property::Contrast,
        Property::Saturation,
        Property::Hue,
        Property::Gain,
        Property::Exposure,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Property::Mode => "Mode",
            Property::Brightness => "Brightness",
            Property::Contrast => "Contrast",
            Property::Saturation => "Saturation",
            Property::Hue => "Hue",
            Property::Gain => "Gain",
            Property::Exposure => "Exposure",
        }
    }
}

/// One line of the property report
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyReading {
    pub property: Property,
    pub value: Option<f64>,
}

impl PropertyReading {
    /// Value worth printing. Many drivers answer 0 for controls they do not
    /// implement, so an exact zero counts as unavailable too.
    pub fn available(&self) -> Option<f64> {
        self.value.filter(|v| *v != 0.0)
    }
}

impl fmt::Display for PropertyReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.available() {
            Some(value) => write!(f, " - {} = {:?}", self.property.label(), value),
            None => write!(f, " - {} not available", self.property.label()),
        }
    }
}

/// Query every reported property in order
pub fn read_properties<C: CaptureSource + ?Sized>(source: &mut C) -> Vec<PropertyReading> {
    Property::ALL
        .iter()
        .map(|&property| PropertyReading {
            property,
            value: source.property(property),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::fake::FakeCamera;
    use crate::config::Resolution;

    #[test]
    fn zero_reads_as_not_available() {
        let reading = PropertyReading {
            property: Property::Gain,
            value: Some(0.0),
        };
        assert_eq!(reading.available(), None);
        assert_eq!(reading.to_string(), " - Gain not available");
    }

    #[test]
    fn missing_control_reads_as_not_available() {
        let reading = PropertyReading {
            property: Property::Mode,
            value: None,
        };
        assert_eq!(reading.to_string(), " - Mode not available");
    }

    #[test]
    fn values_keep_float_form() {
        let reading = PropertyReading {
            property: Property::Brightness,
            value: Some(128.0),
        };
        assert_eq!(reading.to_string(), " - Brightness = 128.0");

        let reading = PropertyReading {
            property: Property::Exposure,
            value: Some(-6.5),
        };
        assert_eq!(reading.to_string(), " - Exposure = -6.5");
    }

    #[test]
    fn report_covers_all_properties_in_order() {
        let mut camera = FakeCamera::new(Resolution::new(640, 480))
            .with_property(Property::Brightness, 0.5)
            .with_property(Property::Hue, 0.0);

        let readings = read_properties(&mut camera);
        let order: Vec<Property> = readings.iter().map(|r| r.property).collect();
        assert_eq!(order, Property::ALL.to_vec());

        let lines: Vec<String> = readings.iter().map(|r| r.to_string()).collect();
        assert_eq!(lines[0], " - Mode not available");
        assert_eq!(lines[1], " - Brightness = 0.5");
        assert_eq!(lines[4], " - Hue not available");
    }
}
