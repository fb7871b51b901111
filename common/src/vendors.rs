/// Defines the contract for resolving device manufacturers from MAC addresses.
pub trait VendorRepository: Send + Sync {
    /// Retrieves the vendor name for a MAC address written as `aa:bb:cc:dd:ee:ff`.
    ///
    /// # Returns
    /// * `Some(String)` - The name of the vendor if found.
    /// * `None` - If the OUI is unknown or the address cannot be read.
    fn get_vendor(&self, mac_addr: &str) -> Option<String>;
}
