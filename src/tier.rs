use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Moderate,
    High,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Low, Tier::Moderate, Tier::High];

    /// Score range of the tier. The ranges are contiguous and cover every
    /// score; `High` is open ended.
    pub fn range(self) -> RangeInclusive<u32> {
        match self {
            Tier::Low => 0..=30,
            Tier::Moderate => 31..=60,
            Tier::High => 61..=u32::MAX,
        }
    }

    pub fn describe(self) -> &'static InflammationResult {
        describe(self)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Low => f.write_str("low"),
            Tier::Moderate => f.write_str("moderate"),
            Tier::High => f.write_str("high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Yellow,
    Red,
}

/// What the presentation layer shows for a tier.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct InflammationResult {
    pub tier: Tier,
    pub title: &'static str,
    pub description: &'static str,
    pub recommendations: &'static [&'static str],
    pub color: Color,
    pub icon: &'static str,
}

static LOW: InflammationResult = InflammationResult {
    tier: Tier::Low,
    title: "Inflamação Baixa",
    description: "Parabéns! Seus sintomas indicam baixos níveis de inflamação intestinal. \
        Continue mantendo hábitos saudáveis para preservar seu bem-estar.",
    recommendations: &[
        "Mantenha uma alimentação equilibrada e natural",
        "Continue praticando atividades físicas regulares",
        "Durma bem e gerencie o estresse no dia a dia",
        "Hidrate-se adequadamente ao longo do dia",
    ],
    color: Color::Green,
    icon: "🔹",
};

static MODERATE: InflammationResult = InflammationResult {
    tier: Tier::Moderate,
    title: "Inflamação Moderada",
    description: "Você apresenta sinais moderados de inflamação intestinal. \
        Algumas mudanças no estilo de vida podem ajudar a melhorar seus sintomas e prevenir o agravamento.",
    recommendations: &[
        "Revise sua alimentação e evite ultraprocessados",
        "Aumente o consumo de fibras e alimentos probióticos",
        "Gerencie melhor o estresse com práticas de relaxamento",
        "Considere consultar um nutricionista especializado",
        "Priorize um sono de qualidade e regular",
    ],
    color: Color::Yellow,
    icon: "⚠️",
};

static HIGH: InflammationResult = InflammationResult {
    tier: Tier::High,
    title: "Inflamação Alta",
    description: "Seus sintomas indicam níveis elevados de inflamação intestinal. \
        É importante buscar orientação profissional para investigar as causas e implementar um tratamento adequado.",
    recommendations: &[
        "Procure um médico ou nutricionista especializado urgentemente",
        "Investigue possíveis sensibilidades alimentares (glúten, lactose, etc.)",
        "Implemente um protocolo anti-inflamatório orientado",
        "Priorize sono de qualidade e redução significativa de estresse",
        "Considere exames complementares (microbiota, alergias, etc.)",
        "Evite automedicação e busque acompanhamento profissional",
    ],
    color: Color::Red,
    icon: "🔥",
};

pub fn classify(total_score: u32) -> Tier {
    match total_score {
        0..=30 => Tier::Low,
        31..=60 => Tier::Moderate,
        _ => Tier::High,
    }
}

pub fn describe(tier: Tier) -> &'static InflammationResult {
    match tier {
        Tier::Low => &LOW,
        Tier::Moderate => &MODERATE,
        Tier::High => &HIGH,
    }
}
