use crate::domain::Service;

/// Title recorded on an order whose service id is not in the catalog.
pub const UNKNOWN_SERVICE_TITLE: &str = "Не указано";

static SERVICES: [Service; 3] = [
    Service {
        id: "s1",
        title: "Дизайн логотипа",
        description: "Базовый логотип, 2 варианта",
        price: "1500₴",
    },
    Service {
        id: "s2",
        title: "Верстка сайта",
        description: "Адаптивная верстка до 5 страниц",
        price: "4000₴",
    },
    Service {
        id: "s3",
        title: "SEO-оптимизация",
        description: "Аудит + рекомендации",
        price: "2000₴",
    },
];

pub fn list_services() -> &'static [Service] {
    &SERVICES
}

pub fn find_service(id: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|service| service.id == id)
}

pub fn service_title_or_placeholder(id: &str) -> &'static str {
    find_service(id)
        .map(|service| service.title)
        .unwrap_or(UNKNOWN_SERVICE_TITLE)
}
