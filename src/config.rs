use chrono::Duration;
use std::env;
use std::net::SocketAddr;

use crate::entities::Coordinates;
use crate::error::{config_error, Error};

#[derive(Clone, Debug)]
pub struct Config {
    pub google_maps_api_base: String,
    pub google_maps_api_key: String,
    pub listen_addr: SocketAddr,
    /// Sessions untouched for this long are dropped.
    pub session_ttl: Duration,
    pub map: MapSettings,
}

/// How the map is framed before the user has entered anything.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapSettings {
    pub default_center: Coordinates,
    pub default_zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_center: Coordinates::new(0.0, 0.0),
            default_zoom: 10,
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv` first to pick up a
    /// `.env` file.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let optional = |name: &str| match lookup(name) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(err) => Err(Error::from(err)),
        };

        let google_maps_api_key = lookup("GOOGLE_MAPS_API_KEY")?;
        let google_maps_api_base =
            optional("GOOGLE_MAPS_API_BASE")?.unwrap_or_else(|| "maps.googleapis.com".into());

        let listen_addr = match optional("WAYSIDE_LISTEN_ADDR")? {
            Some(addr) => addr
                .parse()
                .map_err(|_| config_error("WAYSIDE_LISTEN_ADDR"))?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        let session_ttl = match optional("WAYSIDE_SESSION_TTL")? {
            Some(secs) => match secs.parse::<u32>() {
                Ok(secs) if secs > 0 => Duration::seconds(secs.into()),
                _ => return Err(config_error("WAYSIDE_SESSION_TTL")),
            },
            None => Duration::minutes(30),
        };

        let mut map = MapSettings::default();

        if let Some(center) = optional("WAYSIDE_DEFAULT_CENTER")? {
            map.default_center = center
                .parse()
                .map_err(|_| config_error("WAYSIDE_DEFAULT_CENTER"))?;
        }

        if let Some(zoom) = optional("WAYSIDE_DEFAULT_ZOOM")? {
            map.default_zoom = zoom
                .parse()
                .map_err(|_| config_error("WAYSIDE_DEFAULT_ZOOM"))?;
        }

        Ok(Self {
            google_maps_api_base,
            google_maps_api_key,
            listen_addr,
            session_ttl,
            map,
        })
    }
}

#[cfg(test)]
fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, env::VarError> {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    move |name: &str| {
        vars.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .ok_or(env::VarError::NotPresent)
    }
}

#[test]
fn config_defaults_test() {
    let config = Config::from_lookup(lookup_from(&[("GOOGLE_MAPS_API_KEY", "secret")])).unwrap();

    assert_eq!(config.google_maps_api_key, "secret");
    assert_eq!(config.google_maps_api_base, "maps.googleapis.com");
    assert_eq!(config.listen_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
    assert_eq!(config.session_ttl, Duration::seconds(1800));
    assert_eq!(config.map, MapSettings::default());
}

#[test]
fn config_overrides_test() {
    let config = Config::from_lookup(lookup_from(&[
        ("GOOGLE_MAPS_API_KEY", "secret"),
        ("GOOGLE_MAPS_API_BASE", "localhost:8080"),
        ("WAYSIDE_LISTEN_ADDR", "0.0.0.0:8000"),
        ("WAYSIDE_DEFAULT_CENTER", "37.7749,-122.4194"),
        ("WAYSIDE_DEFAULT_ZOOM", "12"),
        ("WAYSIDE_SESSION_TTL", "90"),
    ]))
    .unwrap();

    assert_eq!(config.session_ttl, Duration::seconds(90));

    assert_eq!(config.google_maps_api_base, "localhost:8080");
    assert_eq!(config.listen_addr, SocketAddr::from(([0, 0, 0, 0], 8000)));
    assert_eq!(
        config.map.default_center,
        Coordinates::new(37.7749, -122.4194)
    );
    assert_eq!(config.map.default_zoom, 12);
}

#[test]
fn config_requires_api_key_test() {
    let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
    assert_eq!(err.code, 1);

    let err = Config::from_lookup(lookup_from(&[
        ("GOOGLE_MAPS_API_KEY", "secret"),
        ("WAYSIDE_DEFAULT_ZOOM", "far"),
    ]))
    .unwrap_err();
    assert_eq!(err.code, 2);

    let err = Config::from_lookup(lookup_from(&[
        ("GOOGLE_MAPS_API_KEY", "secret"),
        ("WAYSIDE_SESSION_TTL", "0"),
    ]))
    .unwrap_err();
    assert_eq!(err.code, 2);
}
