/// Detection classes the vision model was trained on.
/// Only mapped classes are ever written to the output table; WINDOW exists
/// to absorb the frequent window/panel misclassifications and NULL marks
/// images with no relevant feature.
pub struct ClassInfo {
    pub code: &'static str,
    pub name: &'static str,
    /// Whether detections of this class are geocoded into the output table.
    pub mapped: bool,
}

pub const CLASS_MAP: &[ClassInfo] = &[
    ClassInfo {
        code: "PV",
        name: "photovoltaic panel",
        mapped: true,
    },
    ClassInfo {
        code: "ST",
        name: "solar thermal panel",
        mapped: true,
    },
    ClassInfo {
        code: "WINDOW",
        name: "window",
        mapped: false,
    },
    ClassInfo {
        code: "NULL",
        name: "no relevant feature",
        mapped: false,
    },
];

pub fn get_class_name(code: &str) -> String {
    CLASS_MAP
        .iter()
        .find(|c| c.code == code)
        .map_or("unknown", |c| c.name)
        .to_string()
}

pub fn is_mapped_class(code: &str) -> bool {
    CLASS_MAP
        .iter()
        .find(|c| c.code == code)
        .is_some_and(|c| c.mapped)
}
