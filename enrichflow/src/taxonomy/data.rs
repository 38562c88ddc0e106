//! Built-in snapshot of the category hierarchy.
//!
//! Levels 1 through 3 carry the full reference tables. Level 4 is a partial
//! snapshot covering the fashion paths; deployments with the complete table
//! load it with [`CategoryTaxonomy::from_json_str`].

use super::CategoryTaxonomy;

#[allow(clippy::too_many_lines)]
pub(super) fn builtin() -> CategoryTaxonomy {
    let mut taxonomy = CategoryTaxonomy::new().with_shopping_categories([
        "stationary", "restaurants", "electronics", "pharmacies", "pet care", "home and garden",
        "beauty", "entertainment", "health and nutrition", "groceries", "fashion", "automotive",
        "sports", "kids", "flowers and gifts",
    ]);

    taxonomy.add_subcategories("fashion", [
        "baby clothes", "undergarments", "accessories", "casual wear", "home decor",
        "beach wear", "outerwear", "neckwear and scarf", "formal wear", "sports wear",
        "swimwear", "designer wear", "sports", "outdoor sports", "footwear", "martial arts",
        "sleepwear", "medical wear", "kids wear", "jewelry", "religious wear",
        "fitness and training", "maternity", "water sports", "eyewear",
    ]);
    taxonomy.add_subcategories("beauty", [
        "skincare", "haircare", "fragrances", "cosmetics",
    ]);
    taxonomy.add_subcategories("home and garden", [
        "drinkware", "home decor", "hardware and home improvement", "tableware", "lighting",
        "kitchenwear", "gardening and outdoor", "bakeware", "outdoor sports",
        "household products", "storage and organization", "appliances", "home essentials",
        "bed and bath", "fitness and training", "furniture", "kitchenware",
    ]);
    taxonomy.add_subcategories("stationary", [
        "office supplies", "stationary", "stationary supplies", "arts and crafts",
        "school supplies", "stationary accessories",
    ]);
    taxonomy.add_subcategories("restaurants", [
        "desserts", "mexican", "pizza", "specialty foods", "egyptian", "burgers", "korean",
        "fast food", "street food", "restaurants", "japanese", "italian", "cafes",
        "mediterranean", "vegan", "salads", "asian", "vietnamese", "lebanese", "international",
        "pasta", "chinese", "bakery and cakes", "french", "juices & drinks", "thai",
        "sandwiches", "seafood", "sushi", "keto", "grills", "healthy", "vegetarian", "indian",
        "american", "middle eastern", "juices and drinks",
    ]);
    taxonomy.add_subcategories("pharmacies", [
        "sportswear", "specialty foods", "first aid and medical equipment", "haircare",
        "dietary supplements", "men's care", "vitamins", "skincare", "women's deodorant",
        "medicine", "eye care", "dental care", "incontinence", "women's care",
    ]);
    taxonomy.add_subcategories("pet care", [
        "aquatic animals", "horses", "dogs", "birds", "small pet supplies", "cats",
    ]);
    taxonomy.add_subcategories("sports", [
        "outdoor sports", "sports", "footwear", "team sports", "winter sports",
        "recreational activities", "swimwear", "fitness and training", "accessories",
        "water sports", "martial arts", "sportswear",
    ]);
    taxonomy.add_subcategories("entertainment", [
        "books", "gaming", "music", "musical instruments", "toys and games",
        "musical equipment",
    ]);
    taxonomy.add_subcategories("health and nutrition", [
        "natural solutions", "weight management", "specialty foods", "men's care",
        "performance supplements", "protein products", "vitamins", "dietary supplements",
    ]);
    taxonomy.add_subcategories("groceries", [
        "salads", "supermarkets", "specialty foods", "mini marts", "bakery and cakes",
        "desserts", "cafes",
    ]);
    taxonomy.add_subcategories("gifts and flowers", [
        "flowers", "gifts",
    ]);
    taxonomy.add_subcategories("automotive", [
        "auto accessories", "motorcycle care",
    ]);
    taxonomy.add_subcategories("kids", [
        "baby safety products", "baby care", "baby furniture", "kids furniture", "baby travel",
        "baby clothes", "swimwear", "kids furniture accessory", "toys and games",
    ]);
    taxonomy.add_subcategories("flowers and gifts", [
        "flowers", "gifts",
    ]);

    taxonomy.add_item_categories("fashion", "baby clothes", [
        "onesie", "diaper shirt", "babygrow", "lap tee", "romper", "baby shoe", "jumpsuit",
        "baby sock", "baby gown", "baby mitten", "diaper cover", "baby leggings", "bloomers",
        "baby accessory",
    ]);
    taxonomy.add_item_categories("fashion", "undergarments", [
        "undershirt", "nightgown", "bra", "camisole", "panty", "baby doll", "boxers", "slip",
        "briefs", "corset",
    ]);
    taxonomy.add_item_categories("fashion", "accessories", [
        "belt", "bag", "headwear", "hair accessories", "glove", "umbrella", "wallet", "luggage",
        "briefcase", "trunk", "laptopcase", "hand fan", "watch",
    ]);
    taxonomy.add_item_categories("fashion", "casual wear", [
        "apron", "top", "trousers", "blouse", "t-shirt", "shirt", "vest", "pants", "shorts",
        "leggings", "skirt", "dress", "outfit", "skort",
    ]);
    taxonomy.add_item_categories("fashion", "beach wear", [
        "bathing cover",
    ]);
    taxonomy.add_item_categories("fashion", "outerwear", [
        "sweatshirt", "sweater", "tank top", "jacket", "coat", "overalls", "jeans", "kimono",
    ]);
    taxonomy.add_item_categories("fashion", "neckwear and scarf", [
        "tie", "shawl", "ascot", "pashmina", "boa", "scarf", "handkerchief", "bandana",
    ]);
    taxonomy.add_item_categories("fashion", "formal wear", [
        "blazer", "suit", "uniform", "rope",
    ]);
    taxonomy.add_item_categories("fashion", "sports wear", [
        "sportswear",
    ]);
    taxonomy.add_item_categories("fashion", "swimwear", [
        "swimsuit",
    ]);
    taxonomy.add_item_categories("fashion", "footwear", [
        "sandals", "slippers", "boot", "sports shoe", "shoe", "stocking", "sock",
        "shoe accessory",
    ]);
    taxonomy.add_item_categories("fashion", "sleepwear", [
        "pajamas",
    ]);
    taxonomy.add_item_categories("fashion", "jewelry", [
        "earrings", "necklace", "bracelet", "broche", "pendant", "cufflink", "head ornament",
        "jewelry box", "ring", "jewelry set", "tie pin",
    ]);
    taxonomy.add_item_categories("fashion", "religious wear", [
        "islamic religious wear", "christian religious wear",
    ]);
    taxonomy.add_item_categories("fashion", "maternity", [
        "maternity",
    ]);
    taxonomy.add_item_categories("fashion", "eyewear", [
        "glasses", "sunglasses",
    ]);
    taxonomy.add_item_categories("beauty", "skincare", [
        "foot care", "hand care", "loofah and sponge", "cotton", "hair removal",
        "face treatment", "anti-aging", "eye treatment", "acne", "skin whitening", "dark spot",
        "sunscreen", "face soap", "face scrub", "face toner", "face moisturizer",
        "face cleanser", "face mask", "hand soap", "body scrub", "bath soap", "bath salt",
        "bath cream", "shower gel", "body moisturizer", "body oil", "face roller",
        "skincare accessory", "injectables", "skincare set",
    ]);
    taxonomy.add_item_categories("beauty", "haircare", [
        "hair gel", "hair brush and comb", "hair mousse", "hair styling tool", "hair wax",
        "hair dye", "hair spray", "hair loss", "hair cream", "hair shampoo", "hair conditioner",
        "hair oil", "hair mask", "hair serum", "haircare set", "hair treatment",
    ]);
    taxonomy.add_item_categories("beauty", "fragrances", [
        "body spray", "cologne", "perfume",
    ]);
    taxonomy.add_item_categories("beauty", "cosmetics", [
        "eye make-up", "lip make-up", "face make-up", "nailcare", "cosmetics accessory",
        "make-up tool", "body make-up", "cosmetic set",
    ]);
    taxonomy.add_item_categories("home and garden", "drinkware", [
        "cup", "glass", "mug", "wine glass", "champagne flute", "martini glass", "beer glass",
        "sake cup", "sherry glass", "shot glass", "cognac glass", "margarira glass",
        "brandy glass", "whisky glass", "rummer", "tumbler", "teacup", "beaker", "coaster",
        "pitcher", "carafe", "jar", "wine opener", "flask", "trembleuse", "straw",
        "drinkware accessory",
    ]);
    taxonomy.add_item_categories("home and garden", "home decor", [
        "wallpaper", "clock", "candle", "vase", "tapestery", "wall art", "picture frame",
        "decorative plate", "home scent", "incense", "mirror", "potpurri",
        "home decor accessory",
    ]);
    taxonomy.add_item_categories("home and garden", "hardware and home improvement", [
        "home tool", "measuring tool", "plumbing tool", "electrical tool", "power tool",
        "hand tool", "welding", "duct tape", "cord", "flashlight", "nail and screw",
        "fastener and snap", "padlock", "shelf support", "window hardware",
        "home automation device",
    ]);
    taxonomy.add_item_categories("home and garden", "tableware", [
        "cutlery", "plate and bowl", "table linen",
    ]);
    taxonomy.add_item_categories("home and garden", "lighting", [
        "wall lighting", "lamp", "chandlier", "light bulb", "underwater lighting",
        "lighting accessory", "ceiling lighting", "floor lighting", "outdoor lighting",
        "lighting system",
    ]);
    taxonomy.add_item_categories("home and garden", "kitchenwear", [
        "cooking utensil", "cooking tool", "speciality cookwear", "ovenware", "pot and pan",
        "kitchen accessory",
    ]);
    taxonomy.add_item_categories("home and garden", "gardening and outdoor", [
        "gardening tool", "gardening equipment", "gardening care", "pool equipment",
    ]);
    taxonomy.add_item_categories("home and garden", "bakeware", [
        "baking pan", "bakeware utensil", "bakeware accessory",
    ]);
    taxonomy.add_item_categories("home and garden", "household products", [
        "cleaning tool", "cleaning products", "house supply",
    ]);
    taxonomy.add_item_categories("home and garden", "storage and organization", [
        "office storage and organization", "clothing storage and organization",
        "bathroom storage and organization", "bedroom storage and organization",
        "kitchen storage and organization", "outdoor storage and organization",
        "kids storage and organization", "garage storage and organization",
    ]);
    taxonomy.add_item_categories("home and garden", "appliances", [
        "personal appliances", "kitchen appliance", "home appliance",
        "heating and cooling unit", "cleaning appliance", "specialty appliance",
    ]);
    taxonomy.add_item_categories("home and garden", "bed and bath", [
        "bath linen", "bath accessory", "bathroom hardware", "bedding",
    ]);
    taxonomy.add_item_categories("home and garden", "furniture", [
        "bedroom furniture", "kitchen furniture", "bathroom furniture", "dining room furniture",
        "living room furniture", "office furniture", "outdoor furniture", "furniture accessory",
        "kids furniture",
    ]);
    taxonomy.add_item_categories("home and garden", "kitchenware", [
        "french press", "percolator", "coffee pot", "tea pot", "tea strainer", "cookware set",
        "double boiler", "braiser", "saucier",
    ]);
    taxonomy.add_item_categories("stationary", "office supplies", [
        "scissors", "sharpener", "desk organizer", "paper puncher", "notebook", "chalk board",
        "desk planner", "white board", "writing pad", "chalk", "stapler", "calendar",
        "sticky note", "folder", "crayon", "tack", "agenda", "sheet protector", "clip board",
        "photo album", "cork board", "office supply accessories",
    ]);
    taxonomy.add_item_categories("stationary", "stationary", [
        "stationary",
    ]);
    taxonomy.add_item_categories("stationary", "stationary supplies", [
        "document holder", "tape", "eraser", "glue", "pencil", "pen", "paper clip", "marker",
        "compass", "book cover", "bookmark", "ruler",
    ]);
    taxonomy.add_item_categories("stationary", "arts and crafts", [
        "craft supply", "knitting", "sewing", "jewelry making", "painting", "drawing",
        "pottery", "sculpting", "basket making", "candle making", "doll making", "craft fabric",
        "floral arranging", "weaving", "print making", "arts and crafts set",
    ]);
    taxonomy.add_item_categories("stationary", "school supplies", [
        "notebook", "writing pad", "chalk board", "chalk", "folder", "crayon", "pencil case",
        "clip board", "pencil holder", "cork board", "book cover", "bookmark",
        "school supply accessories", "ruler",
    ]);
    taxonomy.add_item_categories("stationary", "stationary accessories", [
        "keychain", "pencil case", "pencil holder",
    ]);
    taxonomy.add_item_subcategories("fashion", "top", [
        "t-shirt", "blouse", "polo shirt", "tank top", "sweatshirt", "tunic",
    ]);
    taxonomy.add_item_subcategories("fashion", "shoe", [
        "sneaker", "loafer", "oxford", "heel", "flip flop",
    ]);

    taxonomy
}
