//! Datadog site (provider region) selection

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The six Datadog regions and their site domains.
///
/// Create calls go to the event-management intake host of the site; list
/// and get calls go to the plain API host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Site {
    #[default]
    #[serde(rename = "datadoghq.com")]
    #[value(name = "datadoghq.com")]
    Us1,
    #[serde(rename = "us3.datadoghq.com")]
    #[value(name = "us3.datadoghq.com")]
    Us3,
    #[serde(rename = "us5.datadoghq.com")]
    #[value(name = "us5.datadoghq.com")]
    Us5,
    #[serde(rename = "ap1.datadoghq.com")]
    #[value(name = "ap1.datadoghq.com")]
    Ap1,
    #[serde(rename = "datadoghq.eu")]
    #[value(name = "datadoghq.eu")]
    Eu,
    #[serde(rename = "ddog-gov.com")]
    #[value(name = "ddog-gov.com")]
    Gov,
}

impl Site {
    pub const ALL: [Site; 6] = [Site::Us1, Site::Us3, Site::Us5, Site::Ap1, Site::Eu, Site::Gov];

    /// Site domain as configured in Datadog ("DD_SITE").
    pub fn domain(&self) -> &'static str {
        match self {
            Site::Us1 => "datadoghq.com",
            Site::Us3 => "us3.datadoghq.com",
            Site::Us5 => "us5.datadoghq.com",
            Site::Ap1 => "ap1.datadoghq.com",
            Site::Eu => "datadoghq.eu",
            Site::Gov => "ddog-gov.com",
        }
    }

    /// Short region label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Site::Us1 => "US1",
            Site::Us3 => "US3",
            Site::Us5 => "US5",
            Site::Ap1 => "AP1",
            Site::Eu => "EU",
            Site::Gov => "US1-FED",
        }
    }

    /// Events endpoint on the API host, used for list/get.
    pub fn api_url(&self) -> String {
        format!("https://api.{}/api/v2/events", self.domain())
    }

    /// Events endpoint on the event-management intake host, used for create.
    pub fn intake_url(&self) -> String {
        format!("https://event-management-intake.{}/api/v2/events", self.domain())
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.domain())
    }
}

impl FromStr for Site {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_ascii_lowercase();
        Site::ALL
            .into_iter()
            .find(|site| site.domain() == s)
            .ok_or_else(|| format!("Unknown Datadog site: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_urls() {
        assert_eq!(Site::Us1.api_url(), "https://api.datadoghq.com/api/v2/events");
        assert_eq!(
            Site::Us1.intake_url(),
            "https://event-management-intake.datadoghq.com/api/v2/events"
        );
        assert_eq!(Site::Eu.api_url(), "https://api.datadoghq.eu/api/v2/events");
        assert_eq!(Site::Gov.api_url(), "https://api.ddog-gov.com/api/v2/events");
    }

    #[test]
    fn test_site_from_str_round_trips() {
        for site in Site::ALL {
            assert_eq!(site.domain().parse::<Site>().unwrap(), site);
        }
        assert_eq!("US3.DATADOGHQ.COM".parse::<Site>().unwrap(), Site::Us3);
        assert!("datadoghq.invalid".parse::<Site>().is_err());
    }

    #[test]
    fn test_site_serde_uses_domain() {
        let json = serde_json::to_string(&Site::Ap1).unwrap();
        assert_eq!(json, "\"ap1.datadoghq.com\"");
        let back: Site = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Site::Ap1);
    }
}
