use derive_more::Display;

// Blank input clears a part.
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_blank(part: Option<&String>) -> bool {
    part.is_none_or(|p| p.trim().is_empty())
}

///
/// ValuePart
///
/// Addressable sub-part of a structured value, as edited by a form.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ValuePart {
    Date,
    Time,
    Lat,
    Lon,
    UpperLat,
    UpperLon,
    LowerLat,
    LowerLon,
}

///
/// DateParts
///
/// `date` is `YYYY-MM-DD`; `time` is `HH:MM` or `HH:MM:SS`, UTC.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DateParts {
    pub date: Option<String>,
    pub time: Option<String>,
}

impl DateParts {
    #[must_use]
    pub fn new(date: impl Into<String>, time: Option<&str>) -> Self {
        Self {
            date: normalize(Some(date.into())),
            time: normalize(time.map(str::to_string)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        is_blank(self.date.as_ref()) && is_blank(self.time.as_ref())
    }

    pub(crate) fn set(&mut self, part: ValuePart, value: Option<String>) -> bool {
        match part {
            ValuePart::Date => self.date = normalize(value),
            ValuePart::Time => self.time = normalize(value),
            _ => return false,
        }

        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [&self.date, &self.time].into_iter().flatten().map(String::as_str)
    }
}

///
/// PointParts
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PointParts {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl PointParts {
    #[must_use]
    pub fn new(lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            lat: normalize(Some(lat.into())),
            lon: normalize(Some(lon.into())),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        is_blank(self.lat.as_ref()) && is_blank(self.lon.as_ref())
    }

    /// `lat lon` when both coordinates are set.
    #[must_use]
    pub fn position(&self) -> Option<String> {
        match (&self.lat, &self.lon) {
            (Some(lat), Some(lon)) => Some(format!("{lat} {lon}")),
            _ => None,
        }
    }

    pub(crate) fn set(&mut self, part: ValuePart, value: Option<String>) -> bool {
        match part {
            ValuePart::Lat => self.lat = normalize(value),
            ValuePart::Lon => self.lon = normalize(value),
            _ => return false,
        }

        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [&self.lat, &self.lon].into_iter().flatten().map(String::as_str)
    }
}

///
/// BoundsParts
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BoundsParts {
    pub upper_lat: Option<String>,
    pub upper_lon: Option<String>,
    pub lower_lat: Option<String>,
    pub lower_lon: Option<String>,
}

impl BoundsParts {
    /// Build from `[upperLat, upperLon, lowerLat, lowerLon]`.
    #[must_use]
    pub fn from_coords(coords: [&str; 4]) -> Self {
        let [upper_lat, upper_lon, lower_lat, lower_lon] =
            coords.map(|c| normalize(Some(c.to_string())));

        Self {
            upper_lat,
            upper_lon,
            lower_lat,
            lower_lon,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// `(upper corner, lower corner)` when all four coordinates are set.
    #[must_use]
    pub fn corners(&self) -> Option<(String, String)> {
        match (
            &self.upper_lat,
            &self.upper_lon,
            &self.lower_lat,
            &self.lower_lon,
        ) {
            (Some(ulat), Some(ulon), Some(llat), Some(llon)) => {
                Some((format!("{ulat} {ulon}"), format!("{llat} {llon}")))
            }
            _ => None,
        }
    }

    pub(crate) fn set(&mut self, part: ValuePart, value: Option<String>) -> bool {
        let slot = match part {
            ValuePart::UpperLat => &mut self.upper_lat,
            ValuePart::UpperLon => &mut self.upper_lon,
            ValuePart::LowerLat => &mut self.lower_lat,
            ValuePart::LowerLon => &mut self.lower_lon,
            _ => return false,
        };
        *slot = normalize(value);

        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            &self.upper_lat,
            &self.upper_lon,
            &self.lower_lat,
            &self.lower_lon,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
    }
}
