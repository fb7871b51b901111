use std::sync::OnceLock;

use mac_oui::Oui;
use tracing::warn;

use nmapviz_common::network::device::DeviceInfo;
use nmapviz_common::vendors::VendorRepository;

static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

/// Retrieves or initializes the **Organizationally unique identifier** database.
///
/// A database that fails to load is reported once and then treated as empty.
fn get_oui_db() -> Option<&'static Oui> {
    OUI_DB
        .get_or_init(|| match Oui::default() {
            Ok(db) => Some(db),
            Err(e) => {
                warn!("OUI database unavailable, vendor lookup disabled: {e:?}");
                None
            }
        })
        .as_ref()
}

pub struct MacOuiRepo;

impl VendorRepository for MacOuiRepo {
    fn get_vendor(&self, mac_addr: &str) -> Option<String> {
        let oui_db: &Oui = get_oui_db()?;
        match oui_db.lookup_by_mac(mac_addr) {
            Ok(Some(entry)) => Some(entry.company_name.clone()),
            Ok(None) => None,
            Err(_) => None,
        }
    }
}

/// Looks up a vendor for every device that has a MAC address but no vendor.
///
/// Vendors already present in the report are left alone.
pub fn fill_missing_vendors(devices: Vec<DeviceInfo>, repo: &dyn VendorRepository) -> Vec<DeviceInfo> {
    devices
        .into_iter()
        .map(|device| {
            if device.has_known_vendor() || !device.has_known_mac() {
                return device;
            }
            match repo.get_vendor(device.mac_address()) {
                Some(vendor) => device.with_vendor(vendor),
                None => device,
            }
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    struct Lookup;

    impl VendorRepository for Lookup {
        fn get_vendor(&self, mac_addr: &str) -> Option<String> {
            mac_addr.starts_with("B8:27:EB").then(|| "Raspberry Pi Foundation".to_string())
        }
    }

    #[test]
    fn only_devices_without_vendor_are_looked_up() {
        let devices = vec![
            DeviceInfo::new("10.0.0.1", "B8:27:EB:00:00:01", "", "", Vec::new(), ""),
            DeviceInfo::new("10.0.0.2", "B8:27:EB:00:00:02", "Acme", "", Vec::new(), ""),
            DeviceInfo::new("10.0.0.3", "", "", "", Vec::new(), ""),
            DeviceInfo::new("10.0.0.4", "00:11:22:33:44:55", "", "", Vec::new(), ""),
        ];

        let devices = fill_missing_vendors(devices, &Lookup);
        assert_eq!(devices[0].vendor(), "Raspberry Pi Foundation");
        assert_eq!(devices[1].vendor(), "Acme");
        assert_eq!(devices[2].vendor(), "Unknown");
        assert_eq!(devices[3].vendor(), "Unknown");
    }
}
