//! Static reference catalogs: crop profiles and pesticide profiles.

use crate::domain::{CropProfile, PesticideProfile};

const CROP_PROFILES: [CropProfile; 19] = [
    // Kharif (monsoon) crops.
    CropProfile {
        name: "Rice",
        season: "Kharif",
        soil: "Clayey to loamy, good water retention",
        duration: "110-140 days",
        ph_range: "5.5 - 7.0",
        water_need: "High",
        notes: "Requires puddled fields and warm temperatures.",
    },
    CropProfile {
        name: "Maize",
        season: "Kharif / Rabi",
        soil: "Fertile well-drained loam",
        duration: "90-110 days",
        ph_range: "5.8 - 7.2",
        water_need: "Moderate",
        notes: "Sensitive to waterlogging.",
    },
    CropProfile {
        name: "Cotton",
        season: "Kharif",
        soil: "Well-drained, deep loamy soils",
        duration: "150-180 days",
        ph_range: "6.0 - 8.0",
        water_need: "Moderate",
        notes: "Requires a long, frost-free period.",
    },
    CropProfile {
        name: "Soybean",
        season: "Kharif",
        soil: "Well-drained, sandy loam to clay",
        duration: "90-120 days",
        ph_range: "6.0 - 7.5",
        water_need: "Moderate",
        notes: "Important oilseed and protein source.",
    },
    CropProfile {
        name: "Groundnut (Peanut)",
        season: "Kharif",
        soil: "Well-drained sandy loam",
        duration: "100-130 days",
        ph_range: "6.0 - 7.0",
        water_need: "Low to Moderate",
        notes: "Needs light soil for peg penetration.",
    },
    CropProfile {
        name: "Pigeon Pea (Arhar/Tur)",
        season: "Kharif",
        soil: "Light to medium loam, well-drained",
        duration: "150-180 days",
        ph_range: "6.0 - 7.5",
        water_need: "Low (drought tolerant)",
        notes: "Fixes atmospheric nitrogen.",
    },
    CropProfile {
        name: "Sorghum (Jowar)",
        season: "Kharif",
        soil: "Wide range, but prefers loamy soils",
        duration: "100-120 days",
        ph_range: "6.0 - 8.5",
        water_need: "Low (drought resistant)",
        notes: "Major food and fodder crop.",
    },
    CropProfile {
        name: "Pearl Millet (Bajra)",
        season: "Kharif",
        soil: "Light, sandy soils",
        duration: "75-90 days",
        ph_range: "6.0 - 7.5",
        water_need: "Very Low (highly drought resistant)",
        notes: "Suitable for arid and semi-arid regions.",
    },
    CropProfile {
        name: "Mung Bean (Moong)",
        season: "Kharif / Zaid",
        soil: "Well-drained loam",
        duration: "60-90 days",
        ph_range: "6.5 - 7.5",
        water_need: "Low",
        notes: "Short duration pulse crop.",
    },
    CropProfile {
        name: "Sugarcane",
        season: "Perennial",
        soil: "Well-drained loam or clay loam",
        duration: "300-365 days",
        ph_range: "6.5 - 7.5",
        water_need: "Very High",
        notes: "Requires significant water and nutrients.",
    },
    // Rabi (winter) crops.
    CropProfile {
        name: "Wheat",
        season: "Rabi",
        soil: "Well-drained loam to clay loam",
        duration: "120-150 days",
        ph_range: "6.0 - 7.5",
        water_need: "Moderate (4-5 irrigations)",
        notes: "India's main cereal crop.",
    },
    CropProfile {
        name: "Mustard",
        season: "Rabi",
        soil: "Light to heavy loam",
        duration: "110-140 days",
        ph_range: "6.0 - 7.5",
        water_need: "Low",
        notes: "Requires cool, dry weather during growth.",
    },
    CropProfile {
        name: "Chickpea (Gram/Chana)",
        season: "Rabi",
        soil: "Light to heavy, well-drained soils",
        duration: "90-110 days",
        ph_range: "6.0 - 8.0",
        water_need: "Low",
        notes: "Most important pulse crop in India.",
    },
    CropProfile {
        name: "Barley (Jau)",
        season: "Rabi",
        soil: "Sandy loam to loamy sand",
        duration: "110-130 days",
        ph_range: "6.5 - 8.0",
        water_need: "Low",
        notes: "Tolerant to saline and alkaline soils.",
    },
    CropProfile {
        name: "Lentil (Masoor)",
        season: "Rabi",
        soil: "Light loamy to clayey soils",
        duration: "100-120 days",
        ph_range: "6.0 - 8.0",
        water_need: "Low",
        notes: "Grown in cooler temperatures.",
    },
    CropProfile {
        name: "Potato",
        season: "Rabi",
        soil: "Well-drained sandy loam",
        duration: "80-100 days",
        ph_range: "5.2 - 6.5",
        water_need: "High",
        notes: "Requires consistent moisture.",
    },
    CropProfile {
        name: "Onion",
        season: "Rabi / Kharif",
        soil: "Well-drained, friable loamy soils",
        duration: "120-150 days",
        ph_range: "6.0 - 7.0",
        water_need: "Moderate",
        notes: "Sensitive to extreme temperatures.",
    },
    // Zaid (summer) crops.
    CropProfile {
        name: "Cucumber",
        season: "Zaid",
        soil: "Sandy loam to loamy soils",
        duration: "50-70 days",
        ph_range: "6.0 - 7.0",
        water_need: "High",
        notes: "Grows best in warm, humid conditions.",
    },
    CropProfile {
        name: "Watermelon",
        season: "Zaid",
        soil: "Sandy, well-drained soils",
        duration: "80-100 days",
        ph_range: "6.0 - 7.0",
        water_need: "Moderate",
        notes: "Needs long, sunny days.",
    },
];

const PESTICIDE_PROFILES: [PesticideProfile; 4] = [
    PesticideProfile {
        name: "Imidacloprid 17.8% SL",
        target_pest: "Aphids, Whiteflies, Jassids",
        crop: "Cotton, Vegetables",
        mode_of_action: "Neonicotinoid (IRAC 4A)",
        toxicity: "Moderate; avoid during flowering",
        pre_harvest_interval: "7 days",
        notes: "Apply early; rotate MoA",
    },
    PesticideProfile {
        name: "Chlorantraniliprole 18.5% SC",
        target_pest: "Stem borer, Leaf folder",
        crop: "Rice, Maize",
        mode_of_action: "IRAC 28",
        toxicity: "Low mammalian toxicity",
        pre_harvest_interval: "10-14 days",
        notes: "Target early larvae; good residual",
    },
    PesticideProfile {
        name: "Mancozeb 75% WP",
        target_pest: "Fungal blights and spots",
        crop: "Potato, Tomato, Vegetables",
        mode_of_action: "FRAC M03 (multi-site)",
        toxicity: "Low-Moderate",
        pre_harvest_interval: "7 days",
        notes: "Preventive use; rotate with systemics",
    },
    PesticideProfile {
        name: "Azadirachtin 0.15% EC (Neem)",
        target_pest: "Soft-bodied insects",
        crop: "Multiple crops",
        mode_of_action: "Botanical, multiple actions",
        toxicity: "Low",
        pre_harvest_interval: "0-3 days",
        notes: "IPM-friendly; frequent light sprays",
    },
];

pub fn crop_profiles() -> &'static [CropProfile] {
    &CROP_PROFILES
}

pub fn pesticide_profiles() -> &'static [PesticideProfile] {
    &PESTICIDE_PROFILES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_cover_all_seasons() {
        let crops = crop_profiles();
        assert_eq!(crops.len(), 19);
        assert!(crops.iter().any(|c| c.season.contains("Kharif")));
        assert!(crops.iter().any(|c| c.season.contains("Rabi")));
        assert!(crops.iter().any(|c| c.season.contains("Zaid")));
        assert_eq!(pesticide_profiles().len(), 4);
    }

    #[test]
    fn crop_names_are_unique() {
        let crops = crop_profiles();
        for (i, a) in crops.iter().enumerate() {
            for b in &crops[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
