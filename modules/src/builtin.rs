//! Built-in module catalogue.

use badge_naming::{Category, Module};
use badge_types::ModuleKey;

/// Every module this service knows, in a stable order.
pub fn builtin_modules() -> Vec<Module> {
    vec![
        mvp(),
        awshero(),
        rd(),
        ghstar(),
        javachamps(),
        ibmchamp(),
        oracleace(),
        cncfamb(),
        afm(),
    ]
}

pub fn builtin_module(key: &str) -> Option<Module> {
    builtin_modules().into_iter().find(|m| m.key.as_str() == key)
}

/// Microsoft MVPs: award categories with their technology focus areas.
pub fn mvp() -> Module {
    Module::new(
        ModuleKey::from_static("mvp"),
        "Microsoft Most Valuable Professionals (MVPs)",
        "MVPs",
        "ms-mvp",
    )
    .explanation(
        "This is your MVP ID, a GUID. If you open your profile on <a href=\"https://mvp.microsoft.com\" target=\"_blank\">mvp.microsoft.com</a>, it is the last part of the URL, after the last /. For this to work, you need to have the link to your Bluesky profile in the list of social networks on your MVP profile (use \"Other\" as type).",
    )
    .category(Category::new(
        "AI Platform",
        [
            "Azure AI Services",
            "Azure AI Studio",
            "Azure Machine Learning Studio",
            "Responsible AI with Azure",
        ],
    ))
    .category(Category::new(
        "Business Applications",
        [
            "AI ERP",
            "Business Central",
            "Copilot Studio",
            "Customer Experience",
            "Customer Service",
            "Power Apps",
            "Power Automate",
            "Power Pages",
        ],
    ))
    .category(Category::new(
        "Cloud and Datacenter Management",
        [
            "Datacenter Management (Group Policy, System Center)",
            "Enterprise and Platform Security",
            "High Availability",
            "Hyper-V",
            "Linux on Hyper-V",
            "On-premises and Hybrid AKS, Container Management",
            "On-Premises Networking",
            "On-Premises Storage",
            "Windows Server",
        ],
    ))
    .category(Category::new(
        "Data Platform",
        [
            "Analysis Services",
            "Azure Arc (Arc SQL Server, Arc SQL MI)",
            "Azure Cosmos DB",
            "Azure Data Lake",
            "Azure Database for MySQL",
            "Azure Database for PostgreSQL",
            "Azure SQL (Database, Pools, Serverless, Hyperscale, Managed Instance, Virtual Machines)",
            "Azure Synapse Analytics",
            "Data Engineering & Data Science in Fabric",
            "Data Integration",
            "Database Development & DevOps",
            "Microsoft Fabric",
            "Microsoft Purview - Data Governance",
            "Paginated Operational Reports (RDL)",
            "Power BI",
            "Real-Time Intelligence",
            "SQL Server (on Windows, Linux, Containers)",
            "SQL Server ML Services",
            "Tools & Connectivity",
        ],
    ))
    .category(Category::new(
        "Developer Technologies",
        [
            ".NET",
            "C++",
            "Developer Security",
            "Developer Tools",
            "DevOps",
            "Java",
            "Python",
            "Web Development",
        ],
    ))
    .category(Category::new(
        "Internet of Things",
        ["Azure Edge Devices", "Azure IoT Services & Development"],
    ))
    .category(Category::new(
        "M365",
        [
            "Access",
            "Excel",
            "Exchange",
            "Loop",
            "M365 Copilot",
            "M365 Copilot Extensibility",
            "M365 Development",
            "Mesh",
            "Microsoft 365",
            "Microsoft advanced content management and experiences",
            "Microsoft Graph",
            "Microsoft Stream",
            "Microsoft Teams",
            "Microsoft Viva",
            "OneDrive",
            "OneNote",
            "Outlook",
            "Planner",
            "PowerPoint",
            "SharePoint",
            "Visio",
            "Word",
        ],
    ))
    .category(Category::new(
        "Microsoft Azure",
        [
            "Azure Application PaaS",
            "Azure Compute Infrastructure",
            "Azure Cost, Resource & Configuration Management",
            "Azure HPC & AI Infrastructure",
            "Azure Hybrid & Migration",
            "Azure Infrastructure as Code",
            "Azure Innovation Hub",
            "Azure Integration PaaS",
            "Azure Kubernetes and Open Source",
            "Azure Networking",
            "Azure Storage",
            "Azure Well-Architected, Resiliency & Observability",
            "PowerShell",
        ],
    ))
    .category(Category::new(
        "Security",
        [
            "Cloud Security (Microsoft Defender for Cloud, Azure network security products, GitHub Advanced Security)",
            "Azure network security products",
            "GitHub Advanced Security",
            "Identity & Access",
            "Microsoft Intune",
            "Microsoft Purview",
            "Microsoft Security Copilot",
            "SIEM & XDR (Microsoft Sentinel & Microsoft Defender XDR suite)",
        ],
    ))
    .category(Category::new(
        "Windows Development",
        ["Windows Design", "Windows Development"],
    ))
    .category(Category::new(
        "Windows and Devices",
        ["Azure Virtual Desktop", "Surface", "Windows", "Windows 365"],
    ))
    .level1_translation("AI Platform", "AI")
    .level1_translation("Business Applications", "BizApps")
    .level1_translation("Cloud and Datacenter Management", "CDM")
    .level1_translation("Data Platform", "Data Plat.")
    .level1_translation("Developer Technologies", "Dev Tech")
    .level1_translation("Internet of Things", "IoT")
    .level1_translation("Microsoft Azure", "Azure")
    .level1_translation("Windows Development", "Windows Dev")
    .level2_translation("Azure Machine Learning Studio", "Azure ML Studio")
    .level2_translation(
        "Datacenter Management (Group Policy, System Center)",
        "Datacenter Management",
    )
    .level2_translation(
        "On-premises and Hybrid AKS, Container Management",
        "On-prem. & Hybrid AKS, Containers",
    )
    .level2_translation("Enterprise and Platform Security", "Enterpr. & Platf. Security")
    .level2_translation("Azure Arc (Arc SQL Server, Arc SQL MI)", "Azure Arc")
    .level2_translation("Azure Database for MySQL", "Azure DB for MySQL")
    .level2_translation("Azure Database for PostgreSQL", "Azure DB PostgreSQL")
    .level2_translation(
        "Azure SQL (Database, Pools, Serverless, Hyperscale, Managed Instance, Virtual Machines)",
        "Azure SQL",
    )
    .level2_translation("Azure Synapse Analytics", "Azure Synapse")
    .level2_translation(
        "Data Engineering & Data Science in Fabric",
        "Data Eng. in Fabric",
    )
    .level2_translation("Database Development & DevOps", "DB Dev & DevOps")
    .level2_translation("Microsoft Purview - Data Governance", "Microsoft Purview")
    .level2_translation("Paginated Operational Reports (RDL)", "Pag. Op. Reports")
    .level2_translation("Real-Time Intelligence", "RT Intelligence")
    .level2_translation("SQL Server (on Windows, Linux, Containers)", "SQL Server")
    .level2_translation("SQL Server ML Services", "SQL Server ML")
    .level2_translation("Azure IoT Services & Development", "Azure IoT Services & Dev")
    .level2_translation(
        "Microsoft advanced content management and experiences",
        "Advanced content mmgmt",
    )
    .level2_translation("Azure Application PaaS", "Application PaaS")
    .level2_translation("Azure Compute Infrastructure", "Compute Infrastructure")
    .level2_translation(
        "Azure Cost, Resource & Configuration Management",
        "Cost, Resource & Conf Mg.",
    )
    .level2_translation("Azure HPC & AI Infrastructure", "HPC & AI Infrastructure")
    .level2_translation("Azure Hybrid & Migration", "Hybrid & Migration")
    .level2_translation("Azure Infrastructure as Code", "Infrastructure as Code")
    .level2_translation("Azure Innovation Hub", "Innovation Hub")
    .level2_translation("Azure Integration PaaS", "Integration PaaS")
    .level2_translation("Azure Kubernetes and Open Source", "K8s and Open Source")
    .level2_translation("Azure Networking", "Networking")
    .level2_translation("Azure Storage", "Storage")
    .level2_translation(
        "Azure Well-Architected, Resiliency & Observability",
        "Well-Architected etc.",
    )
    .level2_translation(
        "Cloud Security (Microsoft Defender for Cloud, Azure network security products, GitHub Advanced Security)",
        "Cloud Security",
    )
    .level2_translation("Azure network security products", "Azure net security")
    .level2_translation("GitHub Advanced Security", "GitHub Adv. Security")
    .level2_translation("Microsoft Security Copilot", "Microsoft Sec. Copilot")
    .level2_translation(
        "SIEM & XDR (Microsoft Sentinel & Microsoft Defender XDR suite)",
        "SIEM & XDR",
    )
    .level2_translation("Azure Virtual Desktop", "Azure VD")
}

pub fn awshero() -> Module {
    Module::new(ModuleKey::from_static("awshero"), "AWS Heroes", "AWS Heroes", "awshero")
        .explanation(
            "This is your ID in the AWS Heroes list. If you open your profile, it is the last part of the URL after https://builder.aws.com/community/heroes/. For this to work, you need to have the link to your Bluesky profile in the social links on your AWS Hero profile.",
        )
}

pub fn rd() -> Module {
    Module::new(
        ModuleKey::from_static("rd"),
        "Microsoft Regional Directors (RDs)",
        "RDs",
        "ms-rd",
    )
    .explanation(
        "This is your RD ID, a GUID. If you open your profile on <a href=\"https://rd.microsoft.com\" target=\"_blank\">rd.microsoft.com</a>, it is the last part of the URL, after the last /. For this to work, you need to have the link to your Bluesky profile in the list of social networks on your RD profile (use \"Other\" as type).",
    )
}

pub fn ghstar() -> Module {
    Module::new(ModuleKey::from_static("ghstar"), "Github Stars", "GitHub Stars", "ghstar")
        .explanation(
            "This is your ID in the Github Stars list. If you open your profile, it is the last part of the URL after https://stars.github.com/profiles/ and without the / in the end. For this to work, you need to have the link to your Bluesky profile in the Additional links on your Github Stars profile.",
        )
}

pub fn javachamps() -> Module {
    Module::new(
        ModuleKey::from_static("javachamps"),
        "Java Champions",
        "Java Champions",
        "javachamps",
    )
    .explanation(
        "This is your name, exactly as it appears on the Java Champions page. For this to work, you need to have the link to your Bluesky profile (https://bsky.app/profile/...) somewhere in your social links.",
    )
}

pub fn ibmchamp() -> Module {
    Module::new(
        ModuleKey::from_static("ibmchamp"),
        "IBM Champions",
        "IBM Champions",
        "ibmchamp",
    )
    .explanation(
        "This is your ID in the IBM Champions list. If you open your profile, it is the last part of the URL after https://community.ibm.com/community/user/champions/expert/. For this to work, you need to have the link to your Bluesky profile in the social links on your IBM Champion profile.",
    )
}

/// Oracle ACEs hold exactly one level; per-identity naming keeps only that one.
pub fn oracleace() -> Module {
    Module::new(
        ModuleKey::from_static("oracleace"),
        "Oracle ACEs",
        "Oracle ACEs",
        "oracleace",
    )
    .explanation(
        "This is your ID in the Oracle ACEs list. This is the last part of the URL after https://apexadb.oracle.com/ords/ace/profile/. For this to work, you need to have the link to your Bluesky profile in the Social links on your Oracle ACE profile.",
    )
    .category(Category::new("Associate", Vec::<String>::new()))
    .category(Category::new("Pro", Vec::<String>::new()))
    .category(Category::new("Director", Vec::<String>::new()))
}

pub fn cncfamb() -> Module {
    Module::new(
        ModuleKey::from_static("cncfamb"),
        "CNCF Ambassadors",
        "CNCF Ambassadors",
        "cncfamb",
    )
    .explanation(
        "This is your ID in the CNCF Ambassadors list. If you open your profile, it is the last part of the URL after https://www.cncf.io/people/ambassadors/?p=. For this to work, you need to have the link to your Bluesky profile in the social links on your CNCF Ambassador profile.",
    )
}

pub fn afm() -> Module {
    Module::new(
        ModuleKey::from_static("afm"),
        "Apache Foundation Members",
        "Apache Foundation Members",
        "afm",
    )
    .explanation(
        "This is your ID in the Apache Foundation Members list. You can find it at https://www.apache.org/foundation/members.html. For this to work, you need to have the link to your Bluesky profile in the social links in the Apache Foundation Members phonebook at https://people.apache.org/phonebook.html.",
    )
}
