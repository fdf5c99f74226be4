use serde::Serialize;

/// One directory member as read from a result card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub name: String,
    pub header_location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification_details: Option<String>,
}

impl Record {
    /// Field values in export column order, absent fields as empty strings.
    pub fn fields(&self) -> [&str; 8] {
        [
            self.name.as_str(),
            self.header_location.as_str(),
            self.organization.as_deref().unwrap_or_default(),
            self.address_line1.as_deref().unwrap_or_default(),
            self.address_line2.as_deref().unwrap_or_default(),
            self.phone.as_deref().unwrap_or_default(),
            self.fax.as_deref().unwrap_or_default(),
            self.certification_details.as_deref().unwrap_or_default(),
        ]
    }

    /// Copy of the record with `f` applied to every present field.
    pub fn map_fields(&self, f: impl Fn(&str) -> String) -> Record {
        Record {
            name: f(&self.name),
            header_location: f(&self.header_location),
            organization: self.organization.as_deref().map(&f),
            address_line1: self.address_line1.as_deref().map(&f),
            address_line2: self.address_line2.as_deref().map(&f),
            phone: self.phone.as_deref().map(&f),
            fax: self.fax.as_deref().map(&f),
            certification_details: self.certification_details.as_deref().map(&f),
        }
    }
}
