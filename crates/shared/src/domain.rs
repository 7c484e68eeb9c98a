use serde::{ser::SerializeStruct, Serialize, Serializer};

/// Closed status cycle of an order: `New -> Processing -> Done -> New`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    New,
    Processing,
    Done,
}

impl OrderStatus {
    pub const CYCLE: [OrderStatus; 3] = [Self::New, Self::Processing, Self::Done];

    /// Display name, also the persisted `status` value.
    pub fn name(self) -> &'static str {
        match self {
            Self::New => "Новый",
            Self::Processing => "В обработке",
            Self::Done => "Выполнен",
        }
    }

    /// Style tag, persisted as `statusClass`.
    pub fn class(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Processing => "processing",
            Self::Done => "done",
        }
    }

    pub fn next(self) -> Self {
        let idx = self.index();
        Self::CYCLE[(idx + 1) % Self::CYCLE.len()]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::CYCLE.into_iter().find(|status| status.name() == name)
    }

    fn index(self) -> usize {
        match self {
            Self::New => 0,
            Self::Processing => 1,
            Self::Done => 2,
        }
    }
}

/// Status as found on a stored order. Records written elsewhere may carry a
/// status outside the cycle; it is kept verbatim and the next toggle starts
/// the cycle over at [`OrderStatus::New`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedStatus {
    Known(OrderStatus),
    Unrecognized { name: String, class: String },
}

impl RecordedStatus {
    pub fn name(&self) -> &str {
        match self {
            Self::Known(status) => status.name(),
            Self::Unrecognized { name, .. } => name,
        }
    }

    pub fn class(&self) -> &str {
        match self {
            Self::Known(status) => status.class(),
            Self::Unrecognized { class, .. } => class,
        }
    }

    pub fn known(&self) -> Option<OrderStatus> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Unrecognized { .. } => None,
        }
    }

    pub fn next(&self) -> OrderStatus {
        self.known().map_or(OrderStatus::New, OrderStatus::next)
    }
}

impl Default for RecordedStatus {
    fn default() -> Self {
        Self::Known(OrderStatus::default())
    }
}

impl From<OrderStatus> for RecordedStatus {
    fn from(status: OrderStatus) -> Self {
        Self::Known(status)
    }
}

impl PartialEq<OrderStatus> for RecordedStatus {
    fn eq(&self, other: &OrderStatus) -> bool {
        self.known() == Some(*other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub price: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_id: String,
    pub service_title: String,
    pub notes: String,
    pub status: RecordedStatus,
    /// Milliseconds since the Unix epoch.
    pub created: i64,
}

// The persisted record keeps the display name in `status` and the tag in
// `statusClass`.
impl Serialize for Order {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("Order", 10)?;
        record.serialize_field("id", &self.id)?;
        record.serialize_field("name", &self.name)?;
        record.serialize_field("email", &self.email)?;
        record.serialize_field("phone", &self.phone)?;
        record.serialize_field("serviceId", &self.service_id)?;
        record.serialize_field("serviceTitle", &self.service_title)?;
        record.serialize_field("notes", &self.notes)?;
        record.serialize_field("status", self.status.name())?;
        record.serialize_field("statusClass", self.status.class())?;
        record.serialize_field("created", &self.created)?;
        record.end()
    }
}

/// Raw form input for a new order, before trimming and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewOrder {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_id: String,
    pub notes: String,
}
