//! Segment layouts of the compiled-in directories.
//!
//! Only the business segments the bundled messages use are described. Most
//! segments are identical across directories; where a directory revised a
//! segment (BGM gained `C_C106` in D01B) both variants are kept.

use phf::phf_map;

use crate::layout::{c, composite_c, composite_m, m, simple, SegmentLayout};

const BGM_D93A: SegmentLayout = SegmentLayout {
    tag: "BGM",
    name: "S_BGM",
    elements: &[
        composite_c("C_C002", &[c("D_1001"), c("D_1131"), c("D_3055"), c("D_1000")]),
        simple(c("D_1004")),
        simple(c("D_1225")),
    ],
};

const BGM_D96A: SegmentLayout = SegmentLayout {
    tag: "BGM",
    name: "S_BGM",
    elements: &[
        composite_c("C_C002", &[c("D_1001"), c("D_1131"), c("D_3055"), c("D_1000")]),
        simple(c("D_1004")),
        simple(c("D_1225")),
        simple(c("D_4343")),
    ],
};

const BGM_D01B: SegmentLayout = SegmentLayout {
    tag: "BGM",
    name: "S_BGM",
    elements: &[
        composite_c("C_C002", &[c("D_1001"), c("D_1131"), c("D_3055"), c("D_1000")]),
        composite_c("C_C106", &[c("D_1004"), c("D_1056"), c("D_1060")]),
        simple(c("D_1225")),
        simple(c("D_4343")),
    ],
};

const DTM: SegmentLayout = SegmentLayout {
    tag: "DTM",
    name: "S_DTM",
    elements: &[composite_m("C_C507", &[m("D_2005"), c("D_2380"), c("D_2379")])],
};

const NAD: SegmentLayout = SegmentLayout {
    tag: "NAD",
    name: "S_NAD",
    elements: &[
        simple(m("D_3035")),
        composite_c("C_C082", &[m("D_3039"), c("D_1131"), c("D_3055")]),
        composite_c(
            "C_C058",
            &[m("D_3124"), c("D_3124"), c("D_3124"), c("D_3124"), c("D_3124")],
        ),
        composite_c(
            "C_C080",
            &[m("D_3036"), c("D_3036"), c("D_3036"), c("D_3036"), c("D_3036"), c("D_3045")],
        ),
        composite_c("C_C059", &[m("D_3042"), c("D_3042"), c("D_3042"), c("D_3042")]),
        simple(c("D_3164")),
        composite_c("C_C819", &[c("D_3229"), c("D_1131"), c("D_3055"), c("D_3228")]),
        simple(c("D_3251")),
        simple(c("D_3207")),
    ],
};

const RFF: SegmentLayout = SegmentLayout {
    tag: "RFF",
    name: "S_RFF",
    elements: &[composite_m(
        "C_C506",
        &[m("D_1153"), c("D_1154"), c("D_1156"), c("D_4000"), c("D_1060")],
    )],
};

const CUX: SegmentLayout = SegmentLayout {
    tag: "CUX",
    name: "S_CUX",
    elements: &[
        composite_c("C_C504", &[m("D_6347"), c("D_6345"), c("D_6343"), c("D_6348")]),
        composite_c("C_C504", &[m("D_6347"), c("D_6345"), c("D_6343"), c("D_6348")]),
        simple(c("D_5402")),
        simple(c("D_6341")),
    ],
};

const FTX: SegmentLayout = SegmentLayout {
    tag: "FTX",
    name: "S_FTX",
    elements: &[
        simple(m("D_4451")),
        simple(c("D_4453")),
        composite_c("C_C107", &[m("D_4441"), c("D_1131"), c("D_3055")]),
        composite_c(
            "C_C108",
            &[m("D_4440"), c("D_4440"), c("D_4440"), c("D_4440"), c("D_4440")],
        ),
        simple(c("D_3453")),
    ],
};

const LIN: SegmentLayout = SegmentLayout {
    tag: "LIN",
    name: "S_LIN",
    elements: &[
        simple(c("D_1082")),
        simple(c("D_1229")),
        composite_c("C_C212", &[c("D_7140"), c("D_7143"), c("D_1131"), c("D_3055")]),
        composite_c("C_C829", &[m("D_5495"), c("D_1082")]),
        simple(c("D_1222")),
        simple(c("D_7083")),
    ],
};

const QTY: SegmentLayout = SegmentLayout {
    tag: "QTY",
    name: "S_QTY",
    elements: &[composite_m("C_C186", &[m("D_6063"), m("D_6060"), c("D_6411")])],
};

const PRI: SegmentLayout = SegmentLayout {
    tag: "PRI",
    name: "S_PRI",
    elements: &[
        composite_c(
            "C_C509",
            &[m("D_5125"), c("D_5118"), c("D_5375"), c("D_5387"), c("D_5284"), c("D_6411")],
        ),
        simple(c("D_5213")),
    ],
};

const MOA: SegmentLayout = SegmentLayout {
    tag: "MOA",
    name: "S_MOA",
    elements: &[composite_m(
        "C_C516",
        &[m("D_5025"), c("D_5004"), c("D_6345"), c("D_6343"), c("D_4405")],
    )],
};

const UNS: SegmentLayout = SegmentLayout {
    tag: "UNS",
    name: "S_UNS",
    elements: &[simple(m("D_0081"))],
};

const CNT: SegmentLayout = SegmentLayout {
    tag: "CNT",
    name: "S_CNT",
    elements: &[composite_m("C_C270", &[m("D_6069"), m("D_6066"), c("D_6411")])],
};

const TDT: SegmentLayout = SegmentLayout {
    tag: "TDT",
    name: "S_TDT",
    elements: &[
        simple(m("D_8051")),
        simple(c("D_8028")),
        composite_c("C_C220", &[c("D_8067"), c("D_8066")]),
        composite_c("C_C228", &[c("D_8179"), c("D_8178")]),
        composite_c("C_C040", &[c("D_3127"), c("D_1131"), c("D_3055"), c("D_3128")]),
        simple(c("D_8101")),
        composite_c("C_C401", &[m("D_8457"), m("D_8459"), c("D_7130")]),
        composite_c(
            "C_C222",
            &[c("D_8213"), c("D_1131"), c("D_3055"), c("D_8212"), c("D_8453")],
        ),
        simple(c("D_8281")),
    ],
};

const LOC: SegmentLayout = SegmentLayout {
    tag: "LOC",
    name: "S_LOC",
    elements: &[
        simple(m("D_3227")),
        composite_c("C_C517", &[c("D_3225"), c("D_1131"), c("D_3055"), c("D_3224")]),
        composite_c("C_C519", &[c("D_3223"), c("D_1131"), c("D_3055"), c("D_3222")]),
        composite_c("C_C553", &[c("D_3233"), c("D_1131"), c("D_3055"), c("D_3232")]),
        simple(c("D_5479")),
    ],
};

const GID: SegmentLayout = SegmentLayout {
    tag: "GID",
    name: "S_GID",
    elements: &[
        simple(c("D_1496")),
        composite_c(
            "C_C213",
            &[c("D_7224"), c("D_7065"), c("D_1131"), c("D_3055"), c("D_7064")],
        ),
        composite_c(
            "C_C213",
            &[c("D_7224"), c("D_7065"), c("D_1131"), c("D_3055"), c("D_7064")],
        ),
        composite_c(
            "C_C213",
            &[c("D_7224"), c("D_7065"), c("D_1131"), c("D_3055"), c("D_7064")],
        ),
    ],
};

const EQD: SegmentLayout = SegmentLayout {
    tag: "EQD",
    name: "S_EQD",
    elements: &[
        simple(m("D_8053")),
        composite_c("C_C237", &[c("D_8260"), c("D_1131"), c("D_3055"), c("D_3207")]),
        composite_c("C_C224", &[c("D_8155"), c("D_1131"), c("D_3055"), c("D_8154")]),
        simple(c("D_8077")),
        simple(c("D_8249")),
        simple(c("D_8169")),
    ],
};

const TSR: SegmentLayout = SegmentLayout {
    tag: "TSR",
    name: "S_TSR",
    elements: &[
        composite_c("C_C536", &[m("D_4065"), c("D_1131"), c("D_3055")]),
        composite_c(
            "C_C233",
            &[m("D_7273"), c("D_1131"), c("D_3055"), c("D_7273"), c("D_1131"), c("D_3055")],
        ),
        composite_c("C_C537", &[m("D_4219"), c("D_1131"), c("D_3055")]),
        composite_c("C_C703", &[m("D_7085"), c("D_1131"), c("D_3055")]),
    ],
};

const CNI: SegmentLayout = SegmentLayout {
    tag: "CNI",
    name: "S_CNI",
    elements: &[
        simple(c("D_1490")),
        composite_c(
            "C_C503",
            &[c("D_1004"), c("D_1373"), c("D_1366"), c("D_3453"), c("D_1056"), c("D_1060")],
        ),
        simple(c("D_1312")),
    ],
};

const STS: SegmentLayout = SegmentLayout {
    tag: "STS",
    name: "S_STS",
    elements: &[
        composite_c("C_C601", &[m("D_9015"), c("D_1131"), c("D_3055")]),
        composite_c("C_C555", &[m("D_4405"), c("D_1131"), c("D_3055"), c("D_4404")]),
        composite_c("C_C556", &[m("D_9013"), c("D_1131"), c("D_3055"), c("D_9012")]),
    ],
};

pub(super) static D93A_SEGMENTS: phf::Map<&'static str, SegmentLayout> = phf_map! {
    "BGM" => BGM_D93A,
    "DTM" => DTM,
    "NAD" => NAD,
    "RFF" => RFF,
    "CUX" => CUX,
    "FTX" => FTX,
    "LIN" => LIN,
    "QTY" => QTY,
    "PRI" => PRI,
    "MOA" => MOA,
    "UNS" => UNS,
    "CNT" => CNT,
};

pub(super) static D96A_SEGMENTS: phf::Map<&'static str, SegmentLayout> = phf_map! {
    "BGM" => BGM_D96A,
    "DTM" => DTM,
    "NAD" => NAD,
    "RFF" => RFF,
    "CUX" => CUX,
    "FTX" => FTX,
    "LIN" => LIN,
    "QTY" => QTY,
    "PRI" => PRI,
    "MOA" => MOA,
    "UNS" => UNS,
    "CNT" => CNT,
    "TDT" => TDT,
    "LOC" => LOC,
    "GID" => GID,
    "EQD" => EQD,
};

pub(super) static D01B_SEGMENTS: phf::Map<&'static str, SegmentLayout> = phf_map! {
    "BGM" => BGM_D01B,
    "DTM" => DTM,
    "NAD" => NAD,
    "RFF" => RFF,
    "CUX" => CUX,
    "FTX" => FTX,
    "LIN" => LIN,
    "QTY" => QTY,
    "PRI" => PRI,
    "MOA" => MOA,
    "UNS" => UNS,
    "CNT" => CNT,
    "TDT" => TDT,
    "LOC" => LOC,
    "GID" => GID,
    "EQD" => EQD,
    "TSR" => TSR,
    "CNI" => CNI,
    "STS" => STS,
};
