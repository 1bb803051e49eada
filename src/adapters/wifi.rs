//! WiFi station-mode bootstrap.
//!
//! Credentials are baked in at build time from `PINBOARD_WIFI_SSID` and
//! `PINBOARD_WIFI_PASSWORD` and validated before the radio is touched.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via
//!   `esp_idf_svc::wifi::BlockingWifi`.
//! - **all other targets**: only credential handling is available.
//!
//! ## Retry policy
//!
//! A fixed budget of `wifi_max_attempts` connection attempts spaced
//! `wifi_retry_delay_ms` apart.  Running out of attempts is fatal to boot.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed { attempts: u16 },
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectionFailed { attempts } => {
                write!(f, "WiFi connection failed after {attempts} attempts")
            }
        }
    }
}

impl core::error::Error for ConnectivityError {}

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(()); // open network
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

/// Validated station credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut creds = Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
        };
        creds
            .ssid
            .push_str(ssid)
            .map_err(|()| ConnectivityError::InvalidSsid)?;
        creds
            .password
            .push_str(password)
            .map_err(|()| ConnectivityError::InvalidPassword)?;
        Ok(creds)
    }

    /// Credentials compiled into the firmware image.
    pub fn from_build_env() -> Result<Self, ConnectivityError> {
        let ssid = option_env!("PINBOARD_WIFI_SSID").unwrap_or("");
        let password = option_env!("PINBOARD_WIFI_PASSWORD").unwrap_or("");
        if ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        Self::new(ssid, password)
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// Station bring-up (device)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use device::connect_station;

#[cfg(target_os = "espidf")]
mod device {
    use esp_idf_hal::modem::Modem;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{
        AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi,
    };
    use log::{info, warn};

    use super::{ConnectivityError, WifiCredentials};
    use crate::config::BridgeConfig;

    /// Start the station and block until it has an IP or the retry budget
    /// runs out.
    pub fn connect_station(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        creds: &WifiCredentials,
        cfg: &BridgeConfig,
    ) -> anyhow::Result<BlockingWifi<EspWifi<'static>>> {
        let mut wifi = BlockingWifi::wrap(
            EspWifi::new(modem, sysloop.clone(), Some(nvs))?,
            sysloop,
        )?;

        let ssid = creds
            .ssid()
            .try_into()
            .map_err(|()| ConnectivityError::InvalidSsid)?;
        let password = creds
            .password()
            .try_into()
            .map_err(|()| ConnectivityError::InvalidPassword)?;
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid,
            password,
            auth_method: if creds.is_open() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        }))?;
        wifi.start()?;
        info!("WiFi: connecting to '{}'", creds.ssid());

        let mut last_err = None;
        for attempt in 1..=cfg.wifi_max_attempts {
            match wifi.connect().and_then(|()| wifi.wait_netif_up()) {
                Ok(()) => {
                    let ip = wifi.wifi().sta_netif().get_ip_info()?.ip;
                    info!("WiFi: connected (attempt {}), open http://{}/", attempt, ip);
                    return Ok(wifi);
                }
                Err(e) => {
                    warn!("WiFi: attempt {}/{} failed: {}", attempt, cfg.wifi_max_attempts, e);
                    last_err = Some(e);
                    let _ = wifi.disconnect();
                    std::thread::sleep(std::time::Duration::from_millis(u64::from(
                        cfg.wifi_retry_delay_ms,
                    )));
                }
            }
        }

        if let Some(e) = last_err {
            log::error!("WiFi: giving up, last error: {}", e);
        }
        Err(ConnectivityError::ConnectionFailed {
            attempts: cfg.wifi_max_attempts,
        }
        .into())
    }
}
