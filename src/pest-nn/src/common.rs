use std::borrow::Cow;

pub const CHANNELS: usize = 3;
pub const HEIGHT: usize = 224;
pub const WIDTH: usize = 224;
pub const NUM_CLASSES: usize = 132;

/// Per-channel RGB statistics of the ImageNet pretraining set.
pub const PIXEL_MEAN: [f32; CHANNELS] = [0.485, 0.456, 0.406];
pub const PIXEL_STD: [f32; CHANNELS] = [0.229, 0.224, 0.225];

/// Labels in the order of the classifier head's output logits.
pub const CLASSES: [&str; NUM_CLASSES] = [
    "Adristyrannus",
    "Aleurocanthus spiniferus",
    "Ampelophaga",
    "Aphis citricola Vander Goot",
    "Apolygus lucorum",
    "Bactrocera tsuneonis",
    "Beet spot flies",
    "Black hairy",
    "Brevipoalpus lewisi McGregor",
    "Ceroplastes rubens",
    "Chlumetia transversa",
    "Chrysomphalus aonidum",
    "Cicadella viridis",
    "Cicadellidae",
    "Colomerus vitis",
    "Dacus dorsalis(Hendel)",
    "Dasineura sp",
    "Deporaus marginatus Pascoe",
    "Erythroneura apicalis",
    "Field Cricket",
    "Fruit piercing moth",
    "Gall fly",
    "Icerya purchasi Maskell",
    "Indigo caterpillar",
    "Jute Stem Weevil",
    "Jute aphid",
    "Jute hairy",
    "Jute red mite",
    "Jute semilooper",
    "Jute stem girdler",
    "Jute stick insect",
    "Lawana imitata Melichar",
    "Leaf beetle",
    "Limacodidae",
    "Locust",
    "Locustoidea",
    "Lycorma delicatula",
    "Mango flat beak leafhopper",
    "Mealybug",
    "Miridae",
    "Nipaecoccus vastalor",
    "Panonchus citri McGregor",
    "Papilio xuthus",
    "Parlatoria zizyphus Lucus",
    "Phyllocnistis citrella Stainton",
    "Phyllocoptes oleiverus ashmead",
    "Pieris canidia",
    "Pod borer",
    "Polyphagotars onemus latus",
    "Potosiabre vitarsis",
    "Prodenia litura",
    "Pseudococcus comstocki Kuwana",
    "Rhytidodera bowrinii white",
    "Rice Stemfly",
    "Salurnis marginella Guerr",
    "Scirtothrips dorsalis Hood",
    "Spilosoma Obliqua",
    "Sternochetus frigidus",
    "Termite",
    "Termite odontotermes (Rambur)",
    "Tetradacus c Bactrocera minax",
    "Thrips",
    "Toxoptera aurantii",
    "Toxoptera citricidus",
    "Trialeurodes vaporariorum",
    "Unaspis yanonensis",
    "Viteus vitifoliae",
    "Xylotrechus",
    "Yellow Mite",
    "alfalfa plant bug",
    "alfalfa seed chalcid",
    "alfalfa weevil",
    "aphids",
    "army worm",
    "asiatic rice borer",
    "beet army worm",
    "beet fly",
    "beet weevil",
    "beetle",
    "bird cherry-oataphid",
    "black cutworm",
    "blister beetle",
    "bollworm",
    "brown plant hopper",
    "cabbage army worm",
    "cerodonta denticornis",
    "corn borer",
    "corn earworm",
    "cutworm",
    "english grain aphid",
    "fall armyworm",
    "flax budworm",
    "flea beetle",
    "grain spreader thrips",
    "grasshopper",
    "green bug",
    "grub",
    "large cutworm",
    "legume blister beetle",
    "longlegged spider mite",
    "lytta polita",
    "meadow moth",
    "mites",
    "mole cricket",
    "odontothrips loti",
    "oides decempunctata",
    "paddy stem maggot",
    "parathrene regalis",
    "peach borer",
    "penthaleus major",
    "red spider",
    "rice gall midge",
    "rice leaf caterpillar",
    "rice leaf roller",
    "rice leafhopper",
    "rice shell pest",
    "rice water weevil",
    "sawfly",
    "sericaorient alismots chulsky",
    "small brown plant hopper",
    "stem borer",
    "tarnished plant bug",
    "therioaphis maculata Buckton",
    "wheat blossom midge",
    "wheat phloeothrips",
    "wheat sawfly",
    "white backed plant hopper",
    "white margined moth",
    "whitefly",
    "wireworm",
    "yellow cutworm",
    "yellow rice borer",
];

/// Label for a logit index. Indices past the table get a `class_{idx}` placeholder.
pub fn label_for(idx: usize) -> Cow<'static, str> {
    match CLASSES.get(idx) {
        Some(name) => Cow::Borrowed(*name),
        None => Cow::Owned(format!("class_{idx}")),
    }
}
