//! SoftAP bring-up.
//!
//! The controller hosts its own network; clients join it and talk to the
//! server on port 80. The core only depends on this producing a routable
//! interface — everything here is plumbing.

use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    ipv4::{self, Mask, Subnet},
    netif::{EspNetif, NetifConfiguration, NetifStack},
    wifi::{
        AccessPointConfiguration, AuthMethod, BlockingWifi, Configuration as WifiConfig, EspWifi,
        WifiDriver,
    },
};

pub const AP_SSID: &str = "FANIX";
pub const AP_PASSWORD: &str = "pico1234";

/// Fixed IP of the AP interface.
const AP_IP: ipv4::Ipv4Addr = ipv4::Ipv4Addr::new(192, 168, 4, 1);
const AP_GATEWAY: ipv4::Ipv4Addr = ipv4::Ipv4Addr::new(192, 168, 4, 1);
const AP_NETMASK: Mask = Mask(24);

/// Start the access point and hand the running driver back; dropping it
/// tears the network down.
pub fn start_ap(
    modem: Modem,
    sysloop: EspSystemEventLoop,
) -> anyhow::Result<BlockingWifi<EspWifi<'static>>> {
    // AP netif with a fixed address, handing out leases itself
    let ap_netif_config = NetifConfiguration {
        ip_configuration: Some(ipv4::Configuration::Router(ipv4::RouterConfiguration {
            subnet: Subnet {
                gateway: AP_GATEWAY,
                mask: AP_NETMASK,
            },
            dhcp_enabled: true,
            dns: Some(AP_IP),
            secondary_dns: None,
        })),
        ..NetifConfiguration::wifi_default_router()
    };

    let ap_netif = EspNetif::new_with_conf(&ap_netif_config)?;

    let driver = WifiDriver::new(modem, sysloop.clone(), None)?;

    // STA netif is unused in AP mode but the API wants one
    let sta_netif = EspNetif::new(NetifStack::Sta)?;

    let mut wifi = BlockingWifi::wrap(EspWifi::wrap_all(driver, sta_netif, ap_netif)?, sysloop)?;

    let ap_config = AccessPointConfiguration {
        ssid: AP_SSID.try_into().unwrap(),
        password: AP_PASSWORD.try_into().unwrap(),
        auth_method: AuthMethod::WPA2Personal,
        ssid_hidden: false,
        channel: 1,
        max_connections: 4,
        ..Default::default()
    };

    wifi.set_configuration(&WifiConfig::AccessPoint(ap_config))?;
    wifi.start()?;

    log::info!("SoftAP '{}' up, AP IP: {}", AP_SSID, AP_IP);

    Ok(wifi)
}
